//! Remote resource access
//!
//! The network seam of the crate: fetching registry/descriptor JSON and
//! downloading + extracting distribution tarballs. Everything network-shaped
//! goes through the [`Fetcher`] trait so install and update flows can run
//! against an in-memory fake in tests.

use crate::error::{ExtmanError, Result};
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const HTTP_TIMEOUT_SECS: u64 = 60;
const USER_AGENT: &str = concat!("extman-cli/", env!("CARGO_PKG_VERSION"));

/// Fetch JSON documents and download-and-extract archives.
pub trait Fetcher {
    /// GET `url` and parse the body as JSON.
    fn fetch_json(&self, url: &str) -> Result<serde_json::Value>;

    /// Download the archive at `url` and extract its contents into `dest`.
    fn download_and_extract(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Blocking HTTP implementation of [`Fetcher`].
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| ExtmanError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        let resp = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .map_err(|e| ExtmanError::Resolution(format!("Request to {} failed: {}", url, e)))?;

        if !resp.status().is_success() {
            return Err(ExtmanError::Resolution(format!(
                "Request to {} failed with status {}",
                url,
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| ExtmanError::Resolution(format!("Reading body of {}: {}", url, e)))?;
        serde_json::from_str(&body)
            .map_err(|e| ExtmanError::Resolution(format!("Invalid JSON from {}: {}", url, e)))
    }

    fn download_and_extract(&self, url: &str, dest: &Path) -> Result<()> {
        let resp = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .map_err(|e| ExtmanError::Download(format!("{}: {}", url, e)))?;

        if !resp.status().is_success() {
            return Err(ExtmanError::Download(format!(
                "{} returned status {}",
                url,
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| ExtmanError::Download(format!("{}: {}", url, e)))?;
        extract_tarball(&bytes, dest)
    }
}

/// Extract a gzipped tarball into `dest`, stripping the single top-level
/// directory both npm tarballs (`package/`) and GitHub archives
/// (`<repo>-<branch>/`) wrap their contents in.
pub(crate) fn extract_tarball(bytes: &[u8], dest: &Path) -> Result<()> {
    let decoder = GzDecoder::new(bytes);
    let mut archive = tar::Archive::new(decoder);

    let entries = archive
        .entries()
        .map_err(|e| ExtmanError::Download(format!("Reading archive: {}", e)))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| ExtmanError::Download(format!("Archive entry: {}", e)))?;

        let entry_type = entry.header().entry_type();
        if entry_type.is_pax_global_extensions()
            || entry_type.is_pax_local_extensions()
            || entry_type.is_gnu_longname()
            || entry_type.is_gnu_longlink()
        {
            continue;
        }

        let path = entry
            .path()
            .map_err(|e| ExtmanError::Download(format!("Archive entry path: {}", e)))?
            .into_owned();

        let stripped: PathBuf = path.components().skip(1).collect();
        if stripped.as_os_str().is_empty() {
            continue;
        }

        let target = dest.join(&stripped);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ExtmanError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        entry
            .unpack(&target)
            .map_err(|e| ExtmanError::Download(format!("Extracting {}: {}", stripped.display(), e)))?;
    }

    Ok(())
}
