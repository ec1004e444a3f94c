//! The conditional target declarator.
//!
//! [`Declarator`] is the programmatic form of a script: declare the
//! project, resolve dependencies, optionally skip, then declare
//! executables. Every operation returns `Result<_, Halt>` so that callers
//! stop at the first skip or error with `?`. Once halted, the declarator
//! refuses further work and [`Declarator::finish`] reports no targets.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::core::{
    DeclareError, Dependency, DependencySpec, Executable, Halt, Outcome, Project,
};
use crate::resolver::DependencyResolver;

/// Accumulates the state of one evaluation pass.
pub struct Declarator<'r> {
    resolver: &'r dyn DependencyResolver,
    project: Option<Project>,
    dependencies: Vec<Dependency>,
    targets: Vec<Executable>,
    names: HashSet<String>,
    halted: Option<Halt>,
}

impl<'r> Declarator<'r> {
    /// Create a declarator that resolves through `resolver`.
    pub fn new(resolver: &'r dyn DependencyResolver) -> Self {
        Declarator {
            resolver,
            project: None,
            dependencies: Vec::new(),
            targets: Vec::new(),
            names: HashSet::new(),
            halted: None,
        }
    }

    /// Establish the project identity.
    pub fn project(&mut self, project: Project) -> Result<(), Halt> {
        self.check_live()?;
        tracing::debug!(
            "project `{}` ({})",
            project.name(),
            project
                .languages()
                .iter()
                .map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.project = Some(project);
        Ok(())
    }

    /// Resolve a dependency.
    ///
    /// An unresolved required dependency halts with
    /// [`DeclareError::MissingDependency`]; an unresolved optional one
    /// yields a descriptor whose `is_found()` is false.
    pub fn resolve(&mut self, spec: DependencySpec) -> Result<Dependency, Halt> {
        self.check_live()?;

        let handle = match self.resolver.resolve(&spec) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(
                    "{} resolver could not look up `{}`: {}",
                    self.resolver.name(),
                    spec.display_name(),
                    e
                );
                None
            }
        };

        let handle = handle.filter(|h| {
            let accepted = spec.accepts(h.version.as_ref());
            if !accepted {
                tracing::debug!(
                    "`{}` version {} does not satisfy `{}`",
                    spec.name(),
                    h.version
                        .as_ref()
                        .map_or_else(|| "unknown".to_string(), |v| v.to_string()),
                    spec.version_req().map_or_else(String::new, |r| r.to_string())
                );
            }
            accepted
        });

        let dep = match handle {
            Some(handle) => {
                tracing::debug!("found dependency `{}`", spec.display_name());
                Dependency::found(spec, handle)
            }
            None if spec.is_required() => {
                return Err(self.halt(Halt::Error(DeclareError::MissingDependency {
                    name: spec.display_name(),
                })));
            }
            None => {
                tracing::debug!("optional dependency `{}` not found", spec.display_name());
                Dependency::not_found(spec)
            }
        };

        self.dependencies.push(dep.clone());
        Ok(dep)
    }

    /// Halt with a skip when `condition` holds.
    pub fn skip_if(&mut self, condition: bool, message: impl Into<String>) -> Result<(), Halt> {
        self.check_live()?;
        if condition {
            let message = message.into();
            tracing::info!("skipping: {}", message);
            return Err(self.halt(Halt::Skip(message)));
        }
        Ok(())
    }

    /// Register an executable target.
    ///
    /// Descriptors that were not found contribute no link handle.
    pub fn declare_executable(
        &mut self,
        name: impl Into<String>,
        sources: Vec<PathBuf>,
        dependencies: &[&Dependency],
    ) -> Result<(), Halt> {
        self.check_live()?;
        let name = name.into();

        if self.names.contains(&name) {
            return Err(self.halt(Halt::Error(DeclareError::DuplicateTarget { name })));
        }

        if let Some(project) = &self.project {
            for source in &sources {
                if let Some(lang) = project.undeclared_language(source) {
                    tracing::warn!(
                        "`{}` is a {} source but project `{}` does not declare {}",
                        source.display(),
                        lang,
                        project.name(),
                        lang
                    );
                }
            }
        }

        let handles = dependencies
            .iter()
            .filter_map(|dep| dep.handle().cloned())
            .collect();

        tracing::debug!("declared executable `{}`", name);
        self.names.insert(name.clone());
        self.targets
            .push(Executable::new(name, sources).with_dependencies(handles));
        Ok(())
    }

    /// Whether a skip or error has been produced.
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// Targets registered so far.
    pub fn targets(&self) -> &[Executable] {
        &self.targets
    }

    /// Close the pass. `result` is the outcome of the statements that ran.
    pub fn finish(self, result: Result<(), Halt>) -> Evaluation {
        let outcome = match result {
            Ok(()) => self.halted.map_or(Outcome::Pass, Outcome::from),
            Err(halt) => Outcome::from(halt),
        };

        let targets = if outcome.is_pass() {
            self.targets
        } else {
            Vec::new()
        };

        Evaluation {
            project: self.project,
            outcome,
            dependencies: self.dependencies,
            targets,
        }
    }

    fn check_live(&self) -> Result<(), Halt> {
        match &self.halted {
            Some(halt) => Err(halt.clone()),
            None => Ok(()),
        }
    }

    fn halt(&mut self, halt: Halt) -> Halt {
        self.halted = Some(halt.clone());
        halt
    }
}

/// The result of one evaluation pass.
#[derive(Debug, Clone)]
pub struct Evaluation {
    project: Option<Project>,
    outcome: Outcome,
    dependencies: Vec<Dependency>,
    targets: Vec<Executable>,
}

impl Evaluation {
    /// The declared project, if evaluation got that far.
    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Every dependency resolved before evaluation stopped, in order.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Look up a resolved dependency by name.
    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.iter().rev().find(|d| d.name() == name)
    }

    /// Registered targets in declaration order; empty unless the outcome
    /// is pass.
    pub fn targets(&self) -> &[Executable] {
        &self.targets
    }
}
