//! Script evaluation.
//!
//! Runs each statement of a parsed [`Script`] through a [`Declarator`], in
//! order, stopping at the first skip or error.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;

use crate::core::{DeclareError, Dependency, Halt};
use crate::ops::declarator::{Declarator, Evaluation};
use crate::resolver::DependencyResolver;
use crate::script::{Script, Statement};

/// Evaluate a parsed script.
pub fn evaluate(script: &Script, resolver: &dyn DependencyResolver) -> Evaluation {
    tracing::debug!(
        "evaluating {} with {} resolver",
        script.name(),
        resolver.name()
    );

    let mut declarator = Declarator::new(resolver);
    let result = run(script, &mut declarator);
    let evaluation = declarator.finish(result);

    tracing::info!(
        "{}: {} ({} target{})",
        script.name(),
        evaluation.outcome(),
        evaluation.targets().len(),
        if evaluation.targets().len() == 1 { "" } else { "s" }
    );

    evaluation
}

/// Read, parse and evaluate a script file.
pub fn evaluate_file(path: &Path, resolver: &dyn DependencyResolver) -> Result<Evaluation> {
    let script = Script::from_file(path)?;
    Ok(evaluate(&script, resolver))
}

fn run(script: &Script, declarator: &mut Declarator<'_>) -> Result<(), Halt> {
    let mut bindings: HashMap<&str, Dependency> = HashMap::new();

    for located in script.statements() {
        tracing::trace!(
            "line {}: {}()",
            located.line,
            located.statement.keyword()
        );

        match &located.statement {
            Statement::Project(project) => declarator.project(project.clone())?,
            Statement::Dependency { binding, spec } => {
                let dep = declarator.resolve(spec.clone())?;
                bindings.insert(binding.as_str(), dep);
            }
            Statement::SkipIf { condition, message } => {
                let found = |name: &str| bindings.get(name).map(Dependency::is_found);
                let hit = condition.evaluate(&found)?;
                declarator.skip_if(hit, message.clone())?;
            }
            Statement::Executable(decl) => {
                let deps = decl
                    .dependencies
                    .iter()
                    .map(|binding| {
                        bindings
                            .get(binding.as_str())
                            .ok_or_else(|| DeclareError::UnknownBinding {
                                name: binding.clone(),
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                declarator.declare_executable(decl.name.clone(), decl.sources.clone(), &deps)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::core::Outcome;
    use crate::resolver::{StaticEntry, StaticResolver};
    use crate::test_support::{fixtures, RecordingResolver};

    fn eval(source: &str, resolver: &dyn DependencyResolver) -> Evaluation {
        let script = Script::parse("declare.build", source).unwrap();
        evaluate(&script, resolver)
    }

    #[test]
    fn test_scenario_a_nothing_installed_skips() {
        let evaluation = eval(fixtures::LIBX_FIXTURE, &StaticResolver::new());

        assert_eq!(
            evaluation.outcome(),
            &Outcome::Skip("Need libX dependency".into())
        );
        assert!(evaluation.targets().is_empty());
        assert!(!evaluation.dependency("libX").unwrap().is_found());
        assert!(!evaluation.dependency("libXTest").unwrap().is_found());
    }

    #[test]
    fn test_scenario_b_everything_installed_passes() {
        let evaluation = eval(fixtures::LIBX_FIXTURE, &fixtures::libx_installed(true, true));

        assert_eq!(evaluation.outcome(), &Outcome::Pass);
        let targets = evaluation.targets();
        assert_eq!(targets.len(), 2);

        assert_eq!(targets[0].name, "App");
        assert_eq!(targets[0].sources, vec![PathBuf::from("app.src")]);
        assert_eq!(targets[0].dependency_names(), vec!["libX"]);

        assert_eq!(targets[1].name, "Test");
        assert_eq!(targets[1].sources, vec![PathBuf::from("test.src")]);
        assert_eq!(targets[1].dependency_names(), vec!["libXTest"]);
    }

    #[test]
    fn test_scenario_c_partial_install_still_skips() {
        let evaluation = eval(fixtures::LIBX_FIXTURE, &fixtures::libx_installed(true, false));

        assert!(evaluation.outcome().is_skip());
        assert!(evaluation.targets().is_empty());
        assert!(evaluation.dependency("libX").unwrap().is_found());
        assert!(!evaluation.dependency("libXTest").unwrap().is_found());
    }

    #[test]
    fn test_required_missing_stops_before_later_statements() {
        let resolver = RecordingResolver::new();
        let evaluation = eval(
            "project('p', 'c')\n\
             a = dependency('a')\n\
             b = dependency('b', required: false)\n\
             executable('app', 'main.c')\n",
            &resolver,
        );

        assert!(evaluation.outcome().is_error());
        assert!(evaluation.outcome().message().unwrap().contains("`a`"));
        assert!(evaluation.targets().is_empty());
        // `b` was never looked up
        assert_eq!(resolver.requests(), vec!["a"]);
    }

    #[test]
    fn test_skip_stops_before_later_lookups() {
        let resolver = RecordingResolver::new();
        let evaluation = eval(
            "project('p', 'c')\n\
             a = dependency('a', required: false)\n\
             skip_if(not a.found(), 'no a')\n\
             b = dependency('b')\n",
            &resolver,
        );

        assert_eq!(evaluation.outcome(), &Outcome::Skip("no a".into()));
        assert_eq!(resolver.requests(), vec!["a"]);
    }

    #[test]
    fn test_duplicate_target_regardless_of_dependencies() {
        let source = "project('p', 'c')\n\
                      executable('app', 'a.c')\n\
                      executable('app', 'b.c')\n";

        for resolver in [StaticResolver::new(), fixtures::libx_installed(true, true)] {
            let evaluation = eval(source, &resolver);
            assert!(matches!(
                evaluation.outcome(),
                Outcome::Error(DeclareError::DuplicateTarget { name }) if name == "app"
            ));
            assert!(evaluation.targets().is_empty());
        }
    }

    #[test]
    fn test_zero_executables_is_pass() {
        let evaluation = eval(
            "project('p', 'c')\nx = dependency('x', required: false)\n",
            &StaticResolver::new(),
        );
        assert!(evaluation.outcome().is_pass());
        assert!(evaluation.targets().is_empty());
    }

    #[test]
    fn test_targets_keep_declaration_order() {
        let evaluation = eval(
            "project('p', 'c')\n\
             executable('zeta', 'z.c')\n\
             executable('alpha', 'a.c')\n\
             executable('mid', 'm.c')\n",
            &StaticResolver::new(),
        );
        let names: Vec<&str> = evaluation.targets().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_rebinding_uses_latest_descriptor() {
        let resolver = StaticResolver::new().with("fallback", StaticEntry::default());
        let evaluation = eval(
            "project('p', 'c')\n\
             d = dependency('preferred', required: false)\n\
             d = dependency('fallback', required: false)\n\
             skip_if(not d.found(), 'none')\n\
             executable('app', 'a.c', dependencies: d)\n",
            &resolver,
        );
        assert!(evaluation.outcome().is_pass());
        assert_eq!(evaluation.targets()[0].dependency_names(), vec!["fallback"]);
    }

    #[test]
    fn test_evaluate_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("declare.build");
        std::fs::write(&path, fixtures::LIBX_FIXTURE).unwrap();

        let evaluation = evaluate_file(&path, &StaticResolver::new()).unwrap();
        assert!(evaluation.outcome().is_skip());
    }
}
