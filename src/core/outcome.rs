//! Evaluation outcomes and errors.
//!
//! An evaluation ends in exactly one of three states. A skip is not an
//! error: it reports that the environment lacks an optional prerequisite,
//! and harnesses must keep it apart from both success and failure.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Exit code a harness reads as "skipped".
pub const SKIP_EXIT_CODE: i32 = 77;

/// Hard evaluation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclareError {
    /// A required dependency could not be located.
    #[error("dependency `{name}` not found")]
    MissingDependency { name: String },

    /// Two executables share a name.
    #[error("target `{name}` is already declared")]
    DuplicateTarget { name: String },

    /// A statement referenced a dependency binding that was never assigned.
    #[error("unknown variable `{name}`")]
    UnknownBinding { name: String },
}

impl DeclareError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            DeclareError::MissingDependency { .. } => diag
                .with_suggestion(suggestions::MISSING_DEPENDENCY)
                .with_suggestion(suggestions::ADD_STATIC_ENTRY),
            DeclareError::DuplicateTarget { .. } => {
                diag.with_suggestion(suggestions::DUPLICATE_TARGET)
            }
            DeclareError::UnknownBinding { .. } => diag,
        }
    }
}

/// Why evaluation stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// The script asked to skip.
    Skip(String),
    /// A hard error occurred.
    Error(DeclareError),
}

impl From<DeclareError> for Halt {
    fn from(err: DeclareError) -> Self {
        Halt::Error(err)
    }
}

/// Result of evaluating a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every statement ran.
    Pass,
    /// The script skipped itself.
    Skip(String),
    /// Evaluation failed.
    Error(DeclareError),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Outcome::Skip(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    /// Short label used in reports: `pass`, `skip` or `error`.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Pass => "pass",
            Outcome::Skip(_) => "skip",
            Outcome::Error(_) => "error",
        }
    }

    /// The skip or error message, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            Outcome::Pass => None,
            Outcome::Skip(msg) => Some(msg.clone()),
            Outcome::Error(err) => Some(err.to_string()),
        }
    }

    /// Process exit code for harnesses: 0 pass, 77 skip, 1 error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Pass => 0,
            Outcome::Skip(_) => SKIP_EXIT_CODE,
            Outcome::Error(_) => 1,
        }
    }
}

impl From<Halt> for Outcome {
    fn from(halt: Halt) -> Self {
        match halt {
            Halt::Skip(msg) => Outcome::Skip(msg),
            Halt::Error(err) => Outcome::Error(err),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "pass"),
            Outcome::Skip(msg) => write!(f, "skip({})", msg),
            Outcome::Error(err) => write!(f, "error({})", err),
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Outcome", 2)?;
        state.serialize_field("status", self.label())?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}
