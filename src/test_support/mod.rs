//! Test utilities and mocks for Declarator unit tests.
//!
//! This module provides a mock resolver that records every lookup, so
//! tests can assert which statements actually ran.
//!
//! # Example
//!
//! ```rust,ignore
//! use declarator::test_support::RecordingResolver;
//!
//! #[test]
//! fn test_example() {
//!     let resolver = RecordingResolver::new()
//!         .with_handle(DependencyHandle::new("libX"));
//!     // Evaluate a script against `resolver`...
//!     assert_eq!(resolver.requests(), vec!["libX"]);
//! }
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::sync::Mutex;

use crate::core::{DependencyHandle, DependencySpec};
use crate::resolver::{DependencyResolver, ResolveError};

// Re-export fixtures for convenience
pub use fixtures::*;

/// Mock resolver that records requests.
///
/// Answers from a fixed set of handles keyed by dependency name, ignoring
/// modules, or fails every lookup when built with [`failing`](Self::failing).
#[derive(Debug, Default)]
pub struct RecordingResolver {
    handles: HashMap<String, DependencyHandle>,
    fail: bool,
    requests: Mutex<Vec<String>>,
}

impl RecordingResolver {
    /// A resolver that finds nothing.
    pub fn new() -> Self {
        RecordingResolver::default()
    }

    /// A resolver whose every lookup errors.
    pub fn failing() -> Self {
        RecordingResolver {
            fail: true,
            ..RecordingResolver::default()
        }
    }

    /// Make a dependency resolvable.
    pub fn with_handle(mut self, handle: DependencyHandle) -> Self {
        self.handles.insert(handle.name.clone(), handle);
        self
    }

    /// Display names of every request, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl DependencyResolver for RecordingResolver {
    fn name(&self) -> &str {
        "recording"
    }

    fn resolve(&self, spec: &DependencySpec) -> Result<Option<DependencyHandle>, ResolveError> {
        self.requests.lock().unwrap().push(spec.display_name());

        if self.fail {
            return Err(ResolveError::ToolFailed {
                tool: "mock".to_string(),
                message: "simulated failure".to_string(),
            });
        }

        Ok(self.handles.get(spec.name()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_resolver() {
        let resolver = RecordingResolver::new().with_handle(DependencyHandle::new("libX"));

        assert!(resolver
            .resolve(&DependencySpec::new("libX"))
            .unwrap()
            .is_some());
        assert!(resolver
            .resolve(&DependencySpec::new("libY"))
            .unwrap()
            .is_none());
        assert_eq!(resolver.requests(), vec!["libX", "libY"]);
    }

    #[test]
    fn test_failing_resolver() {
        let resolver = RecordingResolver::failing();
        assert!(resolver.resolve(&DependencySpec::new("libX")).is_err());
        assert_eq!(resolver.requests().len(), 1);
    }
}
