//! Test fixtures for common test scenarios.

use semver::Version;

use crate::resolver::{StaticEntry, StaticResolver};

/// Two optional dependencies guarded by one skip condition, then one
/// executable per dependency.
pub const LIBX_FIXTURE: &str = "\
project('libX dependency test', 'cobol')

libx = dependency('libX', required: false)
libxtest = dependency('libXTest', required: false)

skip_if(not libx.found() or not libxtest.found(), 'Need libX dependency')

executable('App', 'app.src', dependencies: libx)
executable('Test', 'test.src', dependencies: libxtest)
";

/// A static resolver with `libX` and/or `libXTest` installed.
pub fn libx_installed(libx: bool, libxtest: bool) -> StaticResolver {
    let mut resolver = StaticResolver::new();
    if libx {
        resolver.insert(
            "libX",
            StaticEntry {
                version: Some(Version::new(1, 4, 0)),
                link_args: vec!["-lX".to_string()],
                ..StaticEntry::default()
            },
        );
    }
    if libxtest {
        resolver.insert(
            "libXTest",
            StaticEntry {
                version: Some(Version::new(1, 4, 0)),
                link_args: vec!["-lXTest".to_string()],
                ..StaticEntry::default()
            },
        );
    }
    resolver
}

