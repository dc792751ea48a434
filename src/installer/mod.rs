//! Staged installation
//!
//! Each install attempt assembles the new extension version in a fresh,
//! uniquely-named staging directory and only touches the live tree in the
//! final promotion step: remove the old directory, rename the staged one
//! into place. The staging area lives next to the live tree so the rename
//! never crosses a filesystem boundary. The manifest is written before the
//! move; if that write fails, promotion does not happen and no manifest
//! entry points at a directory that was never created.

mod deps;

use crate::core::types::{DistributionInfo, ExtensionRef, InstallEvent, Reporter};
use crate::error::{ExtmanError, Result};
use crate::manifest;
use crate::remote::Fetcher;
use crate::settings::Settings;
use crate::utils::paths;
use std::fs;
use std::path::Path;

pub struct StagedInstaller<'a> {
    fetcher: &'a dyn Fetcher,
    settings: &'a Settings,
}

impl<'a> StagedInstaller<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, settings: &'a Settings) -> Self {
        Self { fetcher, settings }
    }

    /// Download, stage, and atomically promote one resolved extension.
    ///
    /// Returns `false` (without error) when the target path is occupied by
    /// something that is not a directory: one malformed entry must not crash
    /// a batch install of several extensions.
    pub fn install(
        &self,
        reference: &ExtensionRef,
        info: &DistributionInfo,
        report: Reporter,
    ) -> Result<bool> {
        let root = &self.settings.extensions_dir;
        let target = root.join(&info.name);

        if target.exists() && !target.is_dir() {
            report(&InstallEvent::SkippedExistingFile {
                name: info.name.clone(),
                path: target,
            });
            return Ok(false);
        }

        let staging_area = paths::staging_area(root);
        fs::create_dir_all(&staging_area).map_err(|e| ExtmanError::IoError {
            path: staging_area.clone(),
            source: e,
        })?;
        let staging = tempfile::Builder::new()
            .prefix(&format!("{}-", info.name))
            .tempdir_in(&staging_area)
            .map_err(|e| ExtmanError::IoError {
                path: staging_area.clone(),
                source: e,
            })?;

        report(&InstallEvent::Message(format!(
            "Downloading {}",
            info.tarball_url
        )));
        self.fetcher
            .download_and_extract(&info.tarball_url, staging.path())?;

        deps::install_dependencies(staging.path(), info, self.settings, report)?;

        let constraint = reference.manifest_constraint(info)?;
        manifest::record_dependency(root, &info.name, &constraint)?;

        promote(staging, &target)?;
        Ok(true)
    }
}

/// The single point of promotion: after this rename, readers of the live
/// tree see the new version or the old one, never a mixture.
fn promote(staging: tempfile::TempDir, target: &Path) -> Result<()> {
    remove_existing(target)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| ExtmanError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let staged = staging.keep();
    fs::rename(&staged, target).map_err(|e| ExtmanError::IoError {
        path: target.to_path_buf(),
        source: e,
    })
}

fn remove_existing(target: &Path) -> Result<()> {
    match fs::symlink_metadata(target) {
        Ok(meta) => {
            let removed = if meta.file_type().is_dir() {
                fs::remove_dir_all(target)
            } else {
                fs::remove_file(target)
            };
            removed.map_err(|e| ExtmanError::IoError {
                path: target.to_path_buf(),
                source: e,
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ExtmanError::IoError {
            path: target.to_path_buf(),
            source: e,
        }),
    }
}
