//! Dependency resolution collaborators.
//!
//! Locating a dependency on the system is not the evaluator's job. It asks
//! a [`DependencyResolver`] and only interprets the answer: a handle, or
//! nothing. Two resolvers ship with the crate:
//!
//! - [`StaticResolver`] answers from a configured table. Test corpora use
//!   it to pin the environment a fixture sees.
//! - [`PkgConfigResolver`] asks `pkg-config` on the host.

pub mod pkg_config;
pub mod static_resolver;

use semver::Version;
use thiserror::Error;

use crate::core::{DependencyHandle, DependencySpec};
use crate::util::config::{Config, ResolverKind};
use crate::util::diagnostic::{suggestions, Diagnostic};

pub use pkg_config::PkgConfigResolver;
pub use static_resolver::{StaticEntry, StaticResolver};

/// Error raised by a resolver that could not answer at all.
///
/// "Not found" is not an error; resolvers return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("`{tool}` is not installed")]
    ToolUnavailable { tool: String },

    #[error("`{tool}` failed: {message}")]
    ToolFailed { tool: String, message: String },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::ToolUnavailable { tool } => {
                Diagnostic::warning(format!("`{}` is not installed", tool))
                    .with_suggestion(suggestions::INSTALL_PKG_CONFIG)
                    .with_suggestion(suggestions::USE_STATIC_RESOLVER)
            }
            ResolveError::ToolFailed { tool, message } => {
                Diagnostic::warning(format!("`{}` failed", tool)).with_context(message.clone())
            }
        }
    }
}

/// Locates named dependencies for the evaluator.
pub trait DependencyResolver {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Look up a dependency and, when `spec` lists modules, every one of
    /// those modules.
    ///
    /// Returns `Ok(None)` when the dependency is absent. Version
    /// requirements are checked by the caller against the handle.
    fn resolve(&self, spec: &DependencySpec) -> Result<Option<DependencyHandle>, ResolveError>;
}

impl<R: DependencyResolver + ?Sized> DependencyResolver for &R {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn resolve(&self, spec: &DependencySpec) -> Result<Option<DependencyHandle>, ResolveError> {
        (**self).resolve(spec)
    }
}

impl<R: DependencyResolver + ?Sized> DependencyResolver for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn resolve(&self, spec: &DependencySpec) -> Result<Option<DependencyHandle>, ResolveError> {
        (**self).resolve(spec)
    }
}

/// Build the resolver selected by configuration.
pub fn from_config(config: &Config) -> Result<Box<dyn DependencyResolver>, ResolveError> {
    match config.resolver_kind() {
        ResolverKind::Static => Ok(Box::new(StaticResolver::from_entries(
            config.dependencies.clone(),
        ))),
        ResolverKind::PkgConfig => {
            let resolver = match &config.resolver.pkg_config {
                Some(path) => PkgConfigResolver::new(path),
                None => PkgConfigResolver::locate()?,
            };
            Ok(Box::new(resolver))
        }
    }
}

/// Parse a version string as reported by system tools.
///
/// Tools report versions like `1.2`, `3.0.2-beta` or `2.4.1.7`; missing
/// components are zero-filled and anything past the third component is
/// dropped.
pub fn parse_lenient_version(s: &str) -> Option<Version> {
    let s = s.trim();
    if let Ok(v) = Version::parse(s) {
        return Some(v);
    }

    let core = s
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .next()
        .unwrap_or("");
    let mut parts = core.split('.').filter(|p| !p.is_empty());

    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let patch = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);

    Some(Version::new(major, minor, patch))
}
