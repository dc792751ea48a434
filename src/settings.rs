//! Ambient configuration
//!
//! Everything the install/update flows need from the environment: the
//! registry base URL, the extension root, the host version extensions are
//! gated against, and the external package-manager executable used for
//! dependency installation.

use crate::constants::urls::DEFAULT_REGISTRY;
use crate::error::{ExtmanError, Result};
use crate::utils::paths;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Settings {
    /// Registry base URL, no trailing slash (`EXTMAN_REGISTRY`)
    pub registry_base: String,
    /// Root of the live extension tree (`EXTMAN_HOME`)
    pub extensions_dir: PathBuf,
    /// Host version extensions are checked against (`EXTMAN_HOST_VERSION`,
    /// defaults to this crate's version)
    pub host_version: String,
    /// External package manager for dependency installation
    /// (`EXTMAN_PACKAGE_MANAGER`, else `yarn` then `npm` on PATH)
    pub package_manager: Option<PathBuf>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let registry_base = env::var("EXTMAN_REGISTRY")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_REGISTRY.to_string());

        let extensions_dir = match env::var_os("EXTMAN_HOME") {
            Some(dir) => paths::expand_home(Path::new(&dir))?,
            None => paths::default_extensions_dir()?,
        };

        let host_version = env::var("EXTMAN_HOST_VERSION")
            .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

        Ok(Self {
            registry_base,
            extensions_dir,
            host_version,
            package_manager: resolve_package_manager(),
        })
    }

    /// The package-manager executable, required only when a staged package
    /// actually declares dependencies.
    pub fn package_manager_path(&self) -> Result<&Path> {
        self.package_manager.as_deref().ok_or_else(|| {
            ExtmanError::DependencyMissing(
                "no package manager found: install yarn or npm, or set EXTMAN_PACKAGE_MANAGER"
                    .to_string(),
            )
        })
    }
}

fn resolve_package_manager() -> Option<PathBuf> {
    if let Some(configured) = env::var_os("EXTMAN_PACKAGE_MANAGER") {
        let configured = PathBuf::from(configured);
        // A bare name is looked up on PATH; anything with a separator is
        // taken as an explicit path.
        return if configured.components().count() > 1 {
            Some(configured)
        } else {
            which::which(&configured).ok()
        };
    }
    which::which("yarn")
        .or_else(|_| which::which("npm"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_package_manager_is_an_explicit_error() {
        let settings = Settings {
            registry_base: DEFAULT_REGISTRY.to_string(),
            extensions_dir: PathBuf::from("/tmp/extensions"),
            host_version: "0.1.0".to_string(),
            package_manager: None,
        };
        let err = settings.package_manager_path().unwrap_err();
        assert!(matches!(err, ExtmanError::DependencyMissing(_)));
    }
}
