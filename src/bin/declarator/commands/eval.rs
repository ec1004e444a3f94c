//! `declarator eval` command
//!
//! Evaluates a script and prints the outcome. The exit code tells a test
//! harness what happened: 0 pass, 77 skip, 1 error.

use anyhow::Result;

use crate::cli::EvalArgs;
use crate::commands::{build_resolver, load_script, locate_script, report_error};
use declarator::ops::{evaluate, BuildPlan};

pub fn execute(args: EvalArgs, color: bool) -> Result<i32> {
    let path = locate_script(args.resolve.script.as_deref(), color)?;
    let script = load_script(&path)?;
    let resolver = build_resolver(&args.resolve, &path, color)?;

    let evaluation = evaluate(&script, resolver.as_ref());
    let plan = BuildPlan::new(script.name(), &evaluation);

    println!("{}", plan.render(args.format.into())?.trim_end());
    report_error(evaluation.outcome(), &path, resolver.name(), color);

    Ok(evaluation.outcome().exit_code())
}
