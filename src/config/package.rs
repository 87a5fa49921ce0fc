//! Host package descriptor.
//!
//! The name and version of the application doing the logging appear in every
//! line. They are injected; absence only drops the details segment.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Read-only `{ name, version }` of the consuming application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
}

const MANIFEST: &str = "Cargo.toml";

#[derive(Deserialize)]
struct Manifest {
    package: Option<ManifestPackage>,
}

#[derive(Deserialize)]
struct ManifestPackage {
    name: Option<String>,
    version: Option<toml::Value>,
}

impl PackageInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Read `[package]` from a Cargo manifest. Missing file, parse failure, or
    /// missing fields all yield `None`. A workspace-inherited version
    /// (`version.workspace = true`) counts as missing.
    pub fn from_manifest(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        let manifest: Manifest = toml::from_str(&content).ok()?;
        let package = manifest.package?;
        let version = match package.version? {
            toml::Value::String(v) => v,
            _ => return None,
        };
        Some(Self::new(package.name?, version))
    }

    /// Name and version from the `CARGO_PKG_*` variables of the running
    /// process, as set by `cargo run`.
    pub fn from_cargo_env() -> Option<Self> {
        let name = std::env::var("CARGO_PKG_NAME").ok()?;
        let version = std::env::var("CARGO_PKG_VERSION").ok()?;
        Some(Self::new(name, version))
    }

    /// Runtime discovery: `CARGO_PKG_*` first, then `./Cargo.toml`.
    pub fn detect() -> Option<Self> {
        Self::from_cargo_env().or_else(|| Self::from_manifest(Path::new(MANIFEST)))
    }
}

/// Package descriptor of the crate invoking the macro, resolved at compile
/// time.
#[macro_export]
macro_rules! package_info {
    () => {
        $crate::PackageInfo::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    };
}
