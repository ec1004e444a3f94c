//! Declarator - conditional target declarations for build-system test fixtures
//!
//! This crate evaluates small declarative scripts that declare a project,
//! probe for external dependencies, skip themselves when an optional
//! prerequisite is missing, and otherwise register executable targets for
//! a compile/link collaborator.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod script;
pub mod util;

/// Test utilities and mocks for Declarator unit tests.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{Dependency, Executable, Outcome, Project};

pub use ops::{evaluate, Declarator, Evaluation};
pub use resolver::DependencyResolver;
pub use script::Script;
