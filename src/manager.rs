//! Install/update orchestration
//!
//! Ties the pipeline together: reference resolution, the host compatibility
//! gate, staged installation, and manifest bookkeeping. The update path adds
//! two short-circuits in front: symlinked live directories are development
//! checkouts and are never touched, and an installed version that is already
//! `>=` the resolved one needs no reinstall.

use crate::core::compat;
use crate::core::types::{ExtensionRef, InstallEvent, PackageDescriptor, Reporter};
use crate::error::{ExtmanError, Result};
use crate::installer::StagedInstaller;
use crate::remote::Fetcher;
use crate::resolver::Resolver;
use crate::settings::Settings;
use crate::utils::sanitize;
use semver::Version;
use std::fs;

pub struct ExtensionManager<'a> {
    settings: &'a Settings,
    fetcher: &'a dyn Fetcher,
}

/// One entry of the live extension tree.
#[derive(Debug, Clone)]
pub struct InstalledExtension {
    pub name: String,
    pub version: Option<String>,
    /// Symlinked into the tree by hand; owned by the user, never updated.
    pub development: bool,
}

impl<'a> ExtensionManager<'a> {
    pub fn new(settings: &'a Settings, fetcher: &'a dyn Fetcher) -> Self {
        Self { settings, fetcher }
    }

    /// Install the extension `raw_reference` points at.
    ///
    /// Returns `false` when the install was skipped (see
    /// [`StagedInstaller::install`]).
    pub fn install(&self, raw_reference: &str, report: Reporter) -> Result<bool> {
        let reference = ExtensionRef::parse(raw_reference)?;
        let info = self.resolver().resolve(&reference)?;
        compat::check_host_compatibility(
            &info.name,
            info.required_host_version.as_deref(),
            &self.settings.host_version,
        )?;
        StagedInstaller::new(self.fetcher, self.settings).install(&reference, &info, report)
    }

    /// Check one installed extension for updates and perform the update if a
    /// newer version resolves. Returns `true` if an update was installed.
    pub fn check_update(
        &self,
        name: &str,
        uri_override: Option<&str>,
        report: Reporter,
    ) -> Result<bool> {
        sanitize::validate_extension_name(name)?;
        let live = self.settings.extensions_dir.join(name);

        if let Ok(meta) = fs::symlink_metadata(&live)
            && meta.file_type().is_symlink()
        {
            report(&InstallEvent::SkippedSymlink {
                name: name.to_string(),
            });
            return Ok(false);
        }

        let installed = PackageDescriptor::load(&live).ok().and_then(|d| d.version);

        let reference = ExtensionRef::parse(uri_override.unwrap_or(name))?;
        let info = self.resolver().resolve(&reference)?;

        if let Some(installed) = installed.as_deref()
            && !update_needed(installed, info.version.as_deref())
        {
            report(&InstallEvent::UpToDate {
                name: info.name.clone(),
                version: installed.to_string(),
            });
            return Ok(false);
        }

        compat::check_host_compatibility(
            &info.name,
            info.required_host_version.as_deref(),
            &self.settings.host_version,
        )?;
        StagedInstaller::new(self.fetcher, self.settings).install(&reference, &info, report)
    }

    /// Enumerate the live extension tree. Hidden entries (the staging area,
    /// the manifest) are not extensions.
    pub fn installed_extensions(&self) -> Result<Vec<InstalledExtension>> {
        let root = &self.settings.extensions_dir;
        if !root.exists() {
            return Ok(Vec::new());
        }

        let mut extensions = Vec::new();
        let entries = fs::read_dir(root).map_err(|e| ExtmanError::IoError {
            path: root.clone(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| ExtmanError::IoError {
                path: root.clone(),
                source: e,
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let file_type = entry.file_type().map_err(|e| ExtmanError::IoError {
                path: entry.path(),
                source: e,
            })?;
            let development = file_type.is_symlink();
            if !development && !file_type.is_dir() {
                continue;
            }

            let version = PackageDescriptor::load(&entry.path())
                .ok()
                .and_then(|d| d.version);
            extensions.push(InstalledExtension {
                name,
                version,
                development,
            });
        }

        extensions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(extensions)
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.fetcher, &self.settings.registry_base)
    }
}

/// "Not worse than" comparison: equal versions mean no update, guarding
/// against redundant reinstall churn. If either side fails to parse as
/// semver, the update proceeds best-effort.
fn update_needed(installed: &str, resolved: Option<&str>) -> bool {
    match (Version::parse(installed), resolved.map(Version::parse)) {
        (Ok(installed), Some(Ok(resolved))) => installed < resolved,
        _ => true,
    }
}

#[cfg(test)]
mod tests;
