//! Command implementations

pub mod check;
pub mod completions;
pub mod eval;
pub mod plan;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::cli::ResolveArgs;
use declarator::core::Outcome;
use declarator::resolver::{self, DependencyResolver};
use declarator::script::{Script, SCRIPT_NAME};
use declarator::util::config::{global_config_path, load_config, project_config_path, Config};
use declarator::util::diagnostic::{emit, suggestions, Diagnostic};

/// Resolve the script argument to a file path.
///
/// A directory argument means `<dir>/declare.build`; no argument means the
/// current directory.
pub fn locate_script(arg: Option<&Path>, color: bool) -> Result<PathBuf> {
    let path = match arg {
        Some(p) if p.is_dir() => p.join(SCRIPT_NAME),
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()
            .context("failed to determine current directory")?
            .join(SCRIPT_NAME),
    };

    if !path.is_file() {
        emit(
            &Diagnostic::error("no script found")
                .with_location(&path)
                .with_suggestion(suggestions::NO_SCRIPT),
            color,
        );
        bail!("could not find `{}`", path.display());
    }

    Ok(path)
}

/// Read and parse a script, rendering parse errors with source context.
pub fn load_script(path: &Path) -> Result<Script> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script: {}", path.display()))?;

    match Script::parse(path.display().to_string(), &source) {
        Ok(script) => Ok(script),
        Err(err) => {
            let line = err.line(&source);
            eprintln!("{:?}", miette::Report::new(err));
            bail!("could not parse `{}` (line {})", path.display(), line)
        }
    }
}

/// Load configuration for a script and build its resolver.
pub fn build_resolver(
    args: &ResolveArgs,
    script: &Path,
    color: bool,
) -> Result<Box<dyn DependencyResolver>> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => {
            let root = script.parent().unwrap_or_else(|| Path::new("."));
            load_config(global_config_path().as_deref(), &project_config_path(root))?
        }
    };

    if let Some(kind) = args.resolver {
        config.resolver.kind = Some(kind.into());
    }

    match resolver::from_config(&config) {
        Ok(resolver) => {
            tracing::debug!("using {} resolver", resolver.name());
            Ok(resolver)
        }
        Err(err) => {
            emit(&err.to_diagnostic(), color);
            Err(err.into())
        }
    }
}

/// Print the diagnostic for an error outcome.
pub fn report_error(outcome: &Outcome, script: &Path, resolver: &str, color: bool) {
    if let Outcome::Error(err) = outcome {
        let diag = err
            .to_diagnostic()
            .with_location(script)
            .with_context(format!("resolver: {}", resolver));
        emit(&diag, color);
    }
}
