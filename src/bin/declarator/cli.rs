//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use declarator::ops::OutputFormat;
use declarator::util::config::ResolverKind;

/// Declarator - conditional target declarations for build-system test fixtures
#[derive(Parser)]
#[command(name = "declarator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a script and report pass, skip or error
    Eval(EvalArgs),

    /// Evaluate a script and emit the JSON build plan
    Plan(PlanArgs),

    /// Parse a script without resolving anything
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by commands that resolve dependencies.
#[derive(Args)]
pub struct ResolveArgs {
    /// Script file or directory containing declare.build (defaults to current directory)
    pub script: Option<PathBuf>,

    /// Resolver to use (overrides config)
    #[arg(long, value_enum)]
    pub resolver: Option<ResolverArg>,

    /// Config file to use instead of the global and project configs
    #[arg(long, env = "DECLARATOR_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct EvalArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Write the plan to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Script file or directory containing declare.build (defaults to current directory)
    pub script: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ResolverArg {
    /// Configured [dependencies] table
    Static,
    /// Host pkg-config
    PkgConfig,
}

impl From<ResolverArg> for ResolverKind {
    fn from(arg: ResolverArg) -> Self {
        match arg {
            ResolverArg::Static => ResolverKind::Static,
            ResolverArg::PkgConfig => ResolverKind::PkgConfig,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Human,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Human => OutputFormat::Human,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}
