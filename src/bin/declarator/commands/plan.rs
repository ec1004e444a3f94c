//! `declarator plan` command

use anyhow::{Context, Result};

use crate::cli::PlanArgs;
use crate::commands::{build_resolver, load_script, locate_script, report_error};
use declarator::ops::{evaluate, BuildPlan};

pub fn execute(args: PlanArgs, color: bool) -> Result<i32> {
    let path = locate_script(args.resolve.script.as_deref(), color)?;
    let script = load_script(&path)?;
    let resolver = build_resolver(&args.resolve, &path, color)?;

    let evaluation = evaluate(&script, resolver.as_ref());
    let plan_json = BuildPlan::new(script.name(), &evaluation).to_json()?;

    match &args.output {
        Some(output) => {
            std::fs::write(output, format!("{}\n", plan_json))
                .with_context(|| format!("failed to write plan: {}", output.display()))?;
            tracing::info!("Wrote {}", output.display());
        }
        None => println!("{}", plan_json),
    }

    report_error(evaluation.outcome(), &path, resolver.name(), color);

    Ok(evaluation.outcome().exit_code())
}
