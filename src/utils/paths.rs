use crate::error::{ExtmanError, Result};
use directories::{ProjectDirs, UserDirs};
use std::path::{Path, PathBuf};

pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let user_dirs = UserDirs::new()
        .ok_or_else(|| ExtmanError::Other("Could not determine user home directory".to_string()))?;

    let home = user_dirs.home_dir();

    if path_str == "~" {
        return Ok(home.to_path_buf());
    }

    let stripped = path_str
        .strip_prefix("~/")
        .ok_or_else(|| ExtmanError::PathError(format!("Invalid path format: {}", path_str)))?;

    Ok(home.join(stripped))
}

pub fn data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "extman", "extman")
        .ok_or_else(|| ExtmanError::Other("Could not determine data directory".to_string()))?;
    Ok(proj.data_dir().to_path_buf())
}

/// Root of the live extension tree. Each installed extension is a directory
/// named after the extension; the root's own `package.json` is the manifest.
pub fn default_extensions_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("extensions"))
}

/// Hidden staging area next to the live tree. Keeping it on the same
/// filesystem makes the final promotion a true atomic rename.
pub fn staging_area(extensions_dir: &Path) -> PathBuf {
    extensions_dir.join(".staging")
}
