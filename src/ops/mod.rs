//! High-level operations.
//!
//! This module contains the evaluator behind the `declarator` commands.

pub mod declarator;
pub mod evaluate;
pub mod plan;

pub use declarator::{Declarator, Evaluation};
pub use evaluate::{evaluate, evaluate_file};
pub use plan::{BuildPlan, DependencyStatus, OutputFormat};
