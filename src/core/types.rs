//! Core data types
//!
//! Typed forms of the loosely-structured inputs the rest of the crate works
//! with: user-supplied references, resolved distribution metadata, package
//! descriptors, and the progress events reported during installs.

use crate::constants::{DESCRIPTOR_FILE, urls};
use crate::error::{ExtmanError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A user-supplied extension reference, parsed into one of the two
/// resolution strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionRef {
    /// `name` or `name@version`, resolved against the registry
    Registry {
        name: String,
        version: Option<String>,
    },
    /// A source-repository URL (trailing slash already stripped)
    SourceRepo { url: String },
}

impl ExtensionRef {
    /// Parse a raw reference string.
    ///
    /// Anything that looks like an HTTP(S) URL is a source-repository
    /// reference; everything else is split on the first `@` into a name and
    /// an optional version.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ExtmanError::Resolution("empty extension reference".into()));
        }

        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(Self::SourceRepo {
                url: raw.trim_end_matches('/').to_string(),
            });
        }

        match raw.split_once('@') {
            Some((name, version)) => {
                if name.is_empty() || version.is_empty() {
                    return Err(ExtmanError::Resolution(format!(
                        "Invalid extension reference: '{}'",
                        raw
                    )));
                }
                Ok(Self::Registry {
                    name: name.to_string(),
                    version: Some(version.to_string()),
                })
            }
            None => Ok(Self::Registry {
                name: raw.to_string(),
                version: None,
            }),
        }
    }

    /// The constraint recorded in the manifest after a successful install:
    /// the raw URL for source-repository installs (pinning to that exact
    /// source), a `>=` floor on the resolved version otherwise.
    pub fn manifest_constraint(&self, info: &DistributionInfo) -> Result<String> {
        match self {
            Self::SourceRepo { url } => Ok(url.clone()),
            Self::Registry { name, .. } => {
                let version = info.version.as_deref().ok_or_else(|| {
                    ExtmanError::Resolution(format!(
                        "Registry resolution of '{}' produced no version",
                        name
                    ))
                })?;
                Ok(format!(">={}", version))
            }
        }
    }
}

/// Resolved distribution metadata for one extension version.
///
/// `tarball_url` and `name` are always present after successful resolution;
/// absence of `required_host_version` means "no compatibility constraint".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionInfo {
    pub name: String,
    pub version: Option<String>,
    pub tarball_url: String,
    pub required_host_version: Option<String>,
}

/// The `package.json` descriptor carried by every extension.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageDescriptor {
    pub name: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub engines: BTreeMap<String, String>,
}

impl PackageDescriptor {
    /// Read the descriptor inside `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(DESCRIPTOR_FILE);
        if !path.exists() {
            return Err(ExtmanError::Resolution(format!(
                "No {} found under '{}'",
                DESCRIPTOR_FILE,
                dir.display()
            )));
        }
        let content = fs::read_to_string(&path).map_err(|e| ExtmanError::IoError {
            path: path.clone(),
            source: e,
        })?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| ExtmanError::Resolution(format!("Invalid package descriptor: {}", e)))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| ExtmanError::Resolution(format!("Invalid package descriptor: {}", e)))
    }

    /// Declared host-compatibility range, if any.
    pub fn host_requirement(&self) -> Option<&str> {
        self.engines.get(crate::constants::ENGINES_KEY).map(|s| s.as_str())
    }
}

/// Progress events emitted during install/update.
///
/// A side channel, not control flow: the installer keeps going (or stops)
/// regardless of what the reporter does with these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallEvent {
    Message(String),
    /// The external package manager exited non-zero. Non-fatal: the
    /// extension may still load without every optional dependency present.
    DependencyInstallWarning { name: String, detail: String },
    /// The target path exists but is not a directory; this extension's
    /// install is abandoned without failing the whole batch.
    SkippedExistingFile { name: String, path: PathBuf },
    /// The live directory is a symbolic link to a development checkout and
    /// must never be overwritten.
    SkippedSymlink { name: String },
    /// Installed version is already >= the resolved version.
    UpToDate { name: String, version: String },
}

/// Progress-reporting callback handed through install/update calls.
pub type Reporter<'a> = &'a dyn Fn(&InstallEvent);

/// Does this tarball come from the trusted source-repository host?
///
/// Source-repository packages get the package manager's full default
/// install, since they may require scripts or devDependencies absent from a
/// registry-published tarball.
pub fn is_repository_tarball(tarball_url: &str) -> bool {
    tarball_url.starts_with(urls::GITHUB_HOST)
}
