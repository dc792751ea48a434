//! Dependency installation via the external package manager
//!
//! When a staged package declares dependencies, the configured package
//! manager runs inside the staging directory. Registry tarballs get a
//! restricted install: production dependencies only, no lifecycle scripts,
//! no lockfile (staging directories are throwaway). Source-repository
//! packages get the manager's full default install, since they may need
//! scripts or devDependencies that a registry-published tarball would have
//! shipped prebuilt.
//!
//! A non-zero exit is reported as a warning and the install continues: the
//! extension's own code may still load without every optional dependency
//! present.

use crate::core::types::{
    DistributionInfo, InstallEvent, PackageDescriptor, Reporter, is_repository_tarball,
};
use crate::error::{ExtmanError, Result};
use crate::settings::Settings;
use std::path::Path;
use std::process::{Command, Stdio};

pub(crate) fn dependency_args(tarball_url: &str) -> &'static [&'static str] {
    if is_repository_tarball(tarball_url) {
        &["install"]
    } else {
        &["install", "--ignore-scripts", "--no-lockfile", "--production"]
    }
}

pub(crate) fn install_dependencies(
    staging: &Path,
    info: &DistributionInfo,
    settings: &Settings,
    report: Reporter,
) -> Result<()> {
    let descriptor = PackageDescriptor::load(staging)?;
    if descriptor.dependencies.is_empty() {
        return Ok(());
    }

    let package_manager = settings.package_manager_path()?;
    report(&InstallEvent::Message(format!(
        "Installing dependencies of {}",
        info.name
    )));

    let output = Command::new(package_manager)
        .args(dependency_args(&info.tarball_url))
        .current_dir(staging)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| ExtmanError::SystemCommandFailed {
            command: format!("{} install", package_manager.display()),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let detail = String::from_utf8_lossy(&output.stderr).trim().to_string();
        report(&InstallEvent::DependencyInstallWarning {
            name: info.name.clone(),
            detail,
        });
    }

    Ok(())
}
