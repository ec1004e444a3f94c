//! Core data structures for Declarator.
//!
//! This module contains the types that live for one evaluation pass:
//! - Project identity and language tags
//! - Dependency requests, descriptors and link handles
//! - Executable targets
//! - The three-way evaluation outcome

pub mod dependency;
pub mod language;
pub mod outcome;
pub mod project;
pub mod target;

pub use dependency::{Dependency, DependencyHandle, DependencySpec};
pub use language::Language;
pub use outcome::{DeclareError, Halt, Outcome};
pub use project::Project;
pub use target::Executable;
