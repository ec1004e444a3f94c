//! Declarator CLI - evaluates build-system test fixture scripts

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("declarator=debug")
    } else {
        EnvFilter::new("declarator=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .init();

    let color = !cli.no_color;

    // Execute command
    match cli.command {
        Commands::Eval(args) => commands::eval::execute(args, color),
        Commands::Plan(args) => commands::plan::execute(args, color),
        Commands::Check(args) => commands::check::execute(args, color),
        Commands::Completions(args) => commands::completions::execute(args).map(|()| 0),
    }
}
