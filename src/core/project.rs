//! Project identity.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::language::Language;

/// Project metadata established by the first statement of a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    name: String,
    languages: Vec<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl Project {
    /// Create a new project.
    pub fn new(name: impl Into<String>, languages: Vec<Language>) -> Self {
        Project {
            name: name.into(),
            languages,
            version: None,
        }
    }

    /// Set the project version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Get the project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the declared languages, in declaration order.
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Get the project version, if declared.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Check whether the project declared the given language.
    pub fn has_language(&self, lang: Language) -> bool {
        self.languages.contains(&lang)
    }

    /// Language of a source file that the project did not declare, if any.
    ///
    /// Sources with unknown suffixes are never reported.
    pub fn undeclared_language(&self, source: &Path) -> Option<Language> {
        Language::from_source(source).filter(|lang| !self.has_language(*lang))
    }
}
