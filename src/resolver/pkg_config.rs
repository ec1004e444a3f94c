//! pkg-config backed resolver.
//!
//! Module `m` of dependency `d` is looked up as the pkg-config package
//! `d-m`; a request with modules is found only when every module package
//! exists.

use std::path::{Path, PathBuf};

use crate::core::{DependencyHandle, DependencySpec};
use crate::resolver::{parse_lenient_version, DependencyResolver, ResolveError};
use crate::util::process::{find_pkg_config, ProcessBuilder};

/// Resolver that queries the host's pkg-config.
#[derive(Debug, Clone)]
pub struct PkgConfigResolver {
    program: PathBuf,
}

impl PkgConfigResolver {
    /// Use the given pkg-config executable.
    pub fn new(program: impl AsRef<Path>) -> Self {
        PkgConfigResolver {
            program: program.as_ref().to_path_buf(),
        }
    }

    /// Find pkg-config on PATH.
    pub fn locate() -> Result<Self, ResolveError> {
        find_pkg_config()
            .map(PkgConfigResolver::new)
            .ok_or_else(|| ResolveError::ToolUnavailable {
                tool: "pkg-config".to_string(),
            })
    }

    /// pkg-config package names for a request.
    pub fn package_names(spec: &DependencySpec) -> Vec<String> {
        if spec.modules().is_empty() {
            vec![spec.name().to_string()]
        } else {
            spec.modules()
                .iter()
                .map(|m| format!("{}-{}", spec.name(), m))
                .collect()
        }
    }

    fn command(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
    }

    fn query(&self, flag: &str, packages: &[String]) -> Result<String, ResolveError> {
        let output = self
            .command()
            .arg(flag)
            .args(packages)
            .exec_and_check()
            .map_err(|e| self.failed(e))?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn failed(&self, err: anyhow::Error) -> ResolveError {
        ResolveError::ToolFailed {
            tool: self.program.display().to_string(),
            message: format!("{:#}", err),
        }
    }
}

impl DependencyResolver for PkgConfigResolver {
    fn name(&self) -> &str {
        "pkg-config"
    }

    fn resolve(&self, spec: &DependencySpec) -> Result<Option<DependencyHandle>, ResolveError> {
        let packages = Self::package_names(spec);

        let exists = self
            .command()
            .arg("--exists")
            .args(&packages)
            .exec()
            .map_err(|e| self.failed(e))?;
        if !exists.status.success() {
            tracing::debug!("pkg-config has no {}", packages.join(", "));
            return Ok(None);
        }

        let version_text = self.query("--modversion", &packages[..1])?;
        let version = parse_lenient_version(&version_text);
        if version.is_none() {
            tracing::debug!(
                "could not parse version `{}` reported for `{}`",
                version_text,
                spec.name()
            );
        }

        let compile_args = split_flags(&self.query("--cflags", &packages)?);
        let link_args = split_flags(&self.query("--libs", &packages)?);

        Ok(Some(DependencyHandle {
            name: spec.name().to_string(),
            modules: spec.modules().to_vec(),
            version,
            compile_args,
            link_args,
        }))
    }
}

fn split_flags(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}
