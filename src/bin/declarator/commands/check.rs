//! `declarator check` command
//!
//! Parses a script and runs the static checks without resolving any
//! dependency.

use anyhow::Result;

use crate::cli::CheckArgs;
use crate::commands::{load_script, locate_script};
use declarator::script::Statement;

pub fn execute(args: CheckArgs, color: bool) -> Result<i32> {
    let path = locate_script(args.script.as_deref(), color)?;
    let script = load_script(&path)?;

    let dependencies = script
        .statements()
        .iter()
        .filter(|l| matches!(l.statement, Statement::Dependency { .. }))
        .count();
    let executables = script.executable_names();

    println!(
        "{}: ok ({} dependenc{}, {} executable{})",
        path.display(),
        dependencies,
        if dependencies == 1 { "y" } else { "ies" },
        executables.len(),
        if executables.len() == 1 { "" } else { "s" }
    );
    for name in executables {
        println!("  {}", name);
    }

    Ok(0)
}
