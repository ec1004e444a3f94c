//! Dependency descriptors.
//!
//! A [`DependencySpec`] describes what a script asks for: a name, the
//! sub-modules it needs and whether the dependency is required. Resolving
//! a spec yields a [`Dependency`], which either carries a
//! [`DependencyHandle`] usable as a link input or records that nothing was
//! found.

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

/// A request for an external dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// Dependency name
    name: String,

    /// Sub-modules that must be present
    modules: Vec<String>,

    /// Whether a failed lookup aborts evaluation
    required: bool,

    /// Acceptable versions
    version_req: Option<VersionReq>,
}

impl DependencySpec {
    /// Create a new required dependency request with no modules.
    pub fn new(name: impl Into<String>) -> Self {
        DependencySpec {
            name: name.into(),
            modules: Vec::new(),
            required: true,
            version_req: None,
        }
    }

    /// Set the sub-modules to look for.
    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules = modules.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether this dependency is required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Restrict acceptable versions.
    pub fn with_version_req(mut self, req: VersionReq) -> Self {
        self.version_req = Some(req);
        self
    }

    /// Get the dependency name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the requested sub-modules.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Check if a failed lookup is fatal.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Get the version requirement, if any.
    pub fn version_req(&self) -> Option<&VersionReq> {
        self.version_req.as_ref()
    }

    /// Check whether a located version is acceptable.
    ///
    /// A dependency without a known version only satisfies an
    /// unconstrained request.
    pub fn accepts(&self, version: Option<&Version>) -> bool {
        match (&self.version_req, version) {
            (None, _) => true,
            (Some(req), Some(v)) => req.matches(v),
            (Some(_), None) => false,
        }
    }

    /// Human-readable form: `name` or `name (mod1, mod2)`.
    pub fn display_name(&self) -> String {
        if self.modules.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.modules.join(", "))
        }
    }
}

/// Opaque link input for a located dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyHandle {
    /// Dependency name
    pub name: String,

    /// Modules that were located
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,

    /// Located version, if the resolver reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,

    /// Flags needed to compile against the dependency
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compile_args: Vec<String>,

    /// Flags needed to link against the dependency
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link_args: Vec<String>,
}

impl DependencyHandle {
    /// Create a handle with no flags.
    pub fn new(name: impl Into<String>) -> Self {
        DependencyHandle {
            name: name.into(),
            modules: Vec::new(),
            version: None,
            compile_args: Vec::new(),
            link_args: Vec::new(),
        }
    }

    /// Set the located version.
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Set the located modules.
    pub fn with_modules(mut self, modules: Vec<String>) -> Self {
        self.modules = modules;
        self
    }
}

/// A dependency after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    spec: DependencySpec,
    handle: Option<DependencyHandle>,
}

impl Dependency {
    /// A dependency that was located.
    pub fn found(spec: DependencySpec, handle: DependencyHandle) -> Self {
        Dependency {
            spec,
            handle: Some(handle),
        }
    }

    /// A dependency that could not be located.
    pub fn not_found(spec: DependencySpec) -> Self {
        Dependency { spec, handle: None }
    }

    /// Whether the dependency was located.
    pub fn is_found(&self) -> bool {
        self.handle.is_some()
    }

    /// Get the link handle, if located.
    pub fn handle(&self) -> Option<&DependencyHandle> {
        self.handle.as_ref()
    }

    /// Get the originating request.
    pub fn spec(&self) -> &DependencySpec {
        &self.spec
    }

    /// Get the dependency name.
    pub fn name(&self) -> &str {
        self.spec.name()
    }
}
