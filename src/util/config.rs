//! Configuration file support for Declarator.
//!
//! Declarator supports two configuration file locations:
//! - Global: `~/.declarator/config.toml` - User-wide defaults
//! - Project: `.declarator/config.toml` next to the script - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::resolver::StaticEntry;

/// Which resolver answers dependency lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolverKind {
    /// Configured `[dependencies]` table
    #[default]
    Static,
    /// Host pkg-config
    PkgConfig,
}

/// Declarator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolver settings
    pub resolver: ResolverConfig,

    /// Dependencies known to the static resolver
    pub dependencies: BTreeMap<String, StaticEntry>,
}

/// Resolver-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Resolver to use (static, pkg-config)
    pub kind: Option<ResolverKind>,

    /// Explicit pkg-config executable
    pub pkg_config: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file doesn't exist.
    ///
    /// A file that exists but cannot be parsed is an error: an empty table
    /// would make every dependency look uninstalled.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::trace!("no config at {}", path.display());
            Ok(Self::default())
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.resolver.kind.is_some() {
            self.resolver.kind = other.resolver.kind;
        }
        if other.resolver.pkg_config.is_some() {
            self.resolver.pkg_config = other.resolver.pkg_config;
        }

        // Entries are replaced whole, not merged field by field
        self.dependencies.extend(other.dependencies);
    }

    /// The configured resolver kind, defaulting to static.
    pub fn resolver_kind(&self) -> ResolverKind {
        self.resolver.kind.unwrap_or_default()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.declarator/config.toml)
/// 2. Global config (~/.declarator/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path)?);
    }

    config.merge(Config::load_or_default(project_path)?);

    Ok(config)
}

/// Get the global declarator config directory (~/.declarator).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".declarator"))
}

/// Get the global config path (~/.declarator/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.declarator/config.toml) for a script directory.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".declarator").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.resolver.kind.is_none());
        assert_eq!(config.resolver_kind(), ResolverKind::Static);
        assert!(config.dependencies.is_empty());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[resolver]
kind = "pkg-config"
pkg_config = "/usr/bin/pkgconf"

[dependencies.libX]
version = "1.4.0"
modules = ["core", "test"]
link_args = ["-lX"]

[dependencies.libXTest]
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.resolver_kind(), ResolverKind::PkgConfig);
        assert_eq!(
            config.resolver.pkg_config,
            Some(PathBuf::from("/usr/bin/pkgconf"))
        );

        let libx = &config.dependencies["libX"];
        assert_eq!(libx.version, Some(Version::new(1, 4, 0)));
        assert_eq!(libx.modules, vec!["core", "test"]);
        assert_eq!(config.dependencies["libXTest"], StaticEntry::default());
    }

    #[test]
    fn test_config_load_rejects_bad_version() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[dependencies.libX]\nversion = \"one\"\n").unwrap();

        assert!(Config::load(&config_path).is_err());
        assert!(Config::load_or_default(&config_path).is_err());
    }

    #[test]
    fn test_config_load_two_part_version() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[dependencies.libX]\nversion = \"1.4\"\n").unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(
            config.dependencies["libX"].version,
            Some(Version::new(1, 4, 0))
        );
    }

    #[test]
    fn test_load_config_fails_on_malformed_project_config() {
        let tmp = TempDir::new().unwrap();
        let project = project_config_path(tmp.path());
        std::fs::create_dir_all(project.parent().unwrap()).unwrap();
        std::fs::write(&project, "[dependencies.libX\n").unwrap();

        let err = load_config(None, &project).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse config file"));
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.resolver.pkg_config = Some(PathBuf::from("/usr/bin/pkg-config"));
        base.dependencies.insert("libX".into(), StaticEntry::default());

        let mut override_cfg = Config::default();
        override_cfg.resolver.kind = Some(ResolverKind::PkgConfig);
        override_cfg.dependencies.insert(
            "libX".into(),
            StaticEntry {
                version: Some(Version::new(2, 0, 0)),
                ..StaticEntry::default()
            },
        );

        base.merge(override_cfg);

        assert_eq!(base.resolver_kind(), ResolverKind::PkgConfig);
        assert_eq!(
            base.resolver.pkg_config,
            Some(PathBuf::from("/usr/bin/pkg-config"))
        ); // Not overridden
        assert_eq!(
            base.dependencies["libX"].version,
            Some(Version::new(2, 0, 0))
        );
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = project_config_path(tmp.path());
        std::fs::create_dir_all(project.parent().unwrap()).unwrap();

        std::fs::write(&global, "[resolver]\nkind = \"pkg-config\"\n").unwrap();
        std::fs::write(&project, "[resolver]\nkind = \"static\"\n").unwrap();

        let config = load_config(Some(&global), &project).unwrap();
        assert_eq!(config.resolver_kind(), ResolverKind::Static);

        let config = load_config(Some(&global), &tmp.path().join("missing.toml")).unwrap();
        assert_eq!(config.resolver_kind(), ResolverKind::PkgConfig);
    }
}
