//! Installed-extension manifest
//!
//! A single `package.json` at the extension root maps each installed
//! extension name to a constraint: `>=<version>` for registry installs, the
//! raw reference URL for source-repository installs. Keys are kept sorted so
//! rewrites are deterministic and diff cleanly under version control.

use crate::constants::DESCRIPTOR_FILE;
use crate::error::{ExtmanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// BTreeMap keeps dependency keys sorted ascending on every write.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Unknown top-level fields survive a rewrite untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Manifest {
    pub fn path(extensions_dir: &Path) -> PathBuf {
        extensions_dir.join(DESCRIPTOR_FILE)
    }

    /// Load the manifest under `extensions_dir`, or an empty one if none
    /// exists yet. An unparsable manifest is fatal: it must not be silently
    /// replaced with a partial one.
    pub fn load(extensions_dir: &Path) -> Result<Self> {
        let path = Self::path(extensions_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(|e| ExtmanError::IoError {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ExtmanError::ManifestCorrupt {
            path,
            reason: e.to_string(),
        })
    }

    /// Insert or overwrite the entry for `name`.
    pub fn record(&mut self, name: &str, constraint: &str) {
        self.dependencies
            .insert(name.to_string(), constraint.to_string());
    }

    /// Rewrite the whole manifest: pretty-printed, UTF-8, keys sorted.
    /// Written to a same-dir temp file first, then renamed into place.
    pub fn save(&self, extensions_dir: &Path) -> Result<()> {
        fs::create_dir_all(extensions_dir).map_err(|e| ExtmanError::IoError {
            path: extensions_dir.to_path_buf(),
            source: e,
        })?;

        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');

        let path = Self::path(extensions_dir);
        let tmp_path = extensions_dir.join("package.json.tmp");
        let mut tmp_file = fs::File::create(&tmp_path).map_err(|e| ExtmanError::IoError {
            path: tmp_path.clone(),
            source: e,
        })?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &path).map_err(|e| ExtmanError::IoError {
            path: path.clone(),
            source: e,
        })
    }
}

/// Load-modify-save convenience used by the installer between the
/// dependency step and the promotion move.
pub fn record_dependency(extensions_dir: &Path, name: &str, constraint: &str) -> Result<()> {
    let mut manifest = Manifest::load(extensions_dir)?;
    manifest.record(name, constraint);
    manifest.save(extensions_dir)
}
