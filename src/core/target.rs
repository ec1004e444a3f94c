//! Executable target definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::dependency::DependencyHandle;

/// A buildable executable registered by a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Executable {
    /// Target name, unique within a project
    pub name: String,

    /// Source files, in declaration order
    pub sources: Vec<PathBuf>,

    /// Dependencies to link against, in declaration order
    #[serde(default)]
    pub dependencies: Vec<DependencyHandle>,
}

impl Executable {
    /// Create a new executable target.
    pub fn new(name: impl Into<String>, sources: Vec<PathBuf>) -> Self {
        Executable {
            name: name.into(),
            sources,
            dependencies: Vec::new(),
        }
    }

    /// Set the dependency handles to link against.
    pub fn with_dependencies(mut self, dependencies: Vec<DependencyHandle>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Names of the linked dependencies.
    pub fn dependency_names(&self) -> Vec<&str> {
        self.dependencies.iter().map(|d| d.name.as_str()).collect()
    }
}
