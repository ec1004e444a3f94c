//! Table-driven resolver.

use std::collections::BTreeMap;

use semver::Version;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::core::{DependencyHandle, DependencySpec};
use crate::resolver::{parse_lenient_version, DependencyResolver, ResolveError};

/// A dependency the static resolver reports as installed.
///
/// ```toml
/// [dependencies.libX]
/// version = "1.4.0"
/// modules = ["core", "test"]
/// link_args = ["-lX"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticEntry {
    /// Installed version, read the same way pkg-config output is (`1.4`
    /// means `1.4.0`)
    #[serde(default, deserialize_with = "deserialize_version")]
    pub version: Option<Version>,

    /// Available sub-modules
    pub modules: Vec<String>,

    /// Compile flags
    pub compile_args: Vec<String>,

    /// Link flags
    pub link_args: Vec<String>,
}

fn deserialize_version<'de, D>(deserializer: D) -> Result<Option<Version>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_lenient_version(&text)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("invalid version `{}`", text)))
}

/// Resolver backed by a fixed table of installed dependencies.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: BTreeMap<String, StaticEntry>,
}

impl StaticResolver {
    /// Create an empty resolver: nothing is installed.
    pub fn new() -> Self {
        StaticResolver::default()
    }

    /// Create a resolver from configured entries.
    pub fn from_entries(entries: BTreeMap<String, StaticEntry>) -> Self {
        StaticResolver { entries }
    }

    /// Register an installed dependency.
    pub fn insert(&mut self, name: impl Into<String>, entry: StaticEntry) {
        self.entries.insert(name.into(), entry);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, entry: StaticEntry) -> Self {
        self.insert(name, entry);
        self
    }
}

impl DependencyResolver for StaticResolver {
    fn name(&self) -> &str {
        "static"
    }

    fn resolve(&self, spec: &DependencySpec) -> Result<Option<DependencyHandle>, ResolveError> {
        let Some(entry) = self.entries.get(spec.name()) else {
            return Ok(None);
        };

        if let Some(missing) = spec.modules().iter().find(|m| !entry.modules.contains(*m)) {
            tracing::debug!("`{}` has no module `{}`", spec.name(), missing);
            return Ok(None);
        }

        Ok(Some(DependencyHandle {
            name: spec.name().to_string(),
            modules: spec.modules().to_vec(),
            version: entry.version.clone(),
            compile_args: entry.compile_args.clone(),
            link_args: entry.link_args.clone(),
        }))
    }
}
