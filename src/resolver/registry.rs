//! Registry resolution
//!
//! `GET <registry>/<name>` returns the package's full registry document;
//! the requested version (or the `latest` dist-tag) is looked up in its
//! versions map. Registry packages must declare an `engines.extman` range:
//! it is the only signal that the package is meant for this host at all, so
//! its absence is fatal rather than defaulted.

use crate::constants::ENGINES_KEY;
use crate::core::types::DistributionInfo;
use crate::error::{ExtmanError, Result};
use crate::remote::Fetcher;
use crate::utils::sanitize;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    #[serde(rename = "dist-tags", default)]
    dist_tags: DistTags,
    #[serde(default)]
    versions: HashMap<String, VersionEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct DistTags {
    latest: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VersionEntry {
    version: Option<String>,
    dist: Option<DistEntry>,
    #[serde(default)]
    engines: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct DistEntry {
    tarball: Option<String>,
}

pub fn resolve(
    fetcher: &dyn Fetcher,
    registry_base: &str,
    name: &str,
    requested: Option<&str>,
) -> Result<DistributionInfo> {
    sanitize::validate_extension_name(name)?;
    let document = fetcher.fetch_json(&package_url(registry_base, name))?;
    interpret_document(name, requested, document)
}

pub(crate) fn package_url(registry_base: &str, name: &str) -> String {
    format!("{}/{}", registry_base.trim_end_matches('/'), name)
}

/// Pick the version entry and lift it into [`DistributionInfo`].
///
/// Split from the fetch so it can be exercised against canned documents.
pub(crate) fn interpret_document(
    name: &str,
    requested: Option<&str>,
    document: serde_json::Value,
) -> Result<DistributionInfo> {
    let document: RegistryDocument = serde_json::from_value(document).map_err(|e| {
        ExtmanError::Resolution(format!("Malformed registry document for '{}': {}", name, e))
    })?;

    let version = match requested {
        Some(v) => v.to_string(),
        None => document.dist_tags.latest.clone().ok_or_else(|| {
            ExtmanError::Resolution(format!("Registry document for '{}' has no latest tag", name))
        })?,
    };

    let entry = document.versions.get(&version).ok_or_else(|| {
        ExtmanError::Resolution(format!("Version {} of '{}' does not exist", version, name))
    })?;

    let required = entry.engines.get(ENGINES_KEY).cloned().ok_or_else(|| {
        ExtmanError::Resolution(format!(
            "'{}@{}' is not a valid extension: missing engines.{}",
            name, version, ENGINES_KEY
        ))
    })?;

    let tarball_url = entry
        .dist
        .as_ref()
        .and_then(|d| d.tarball.clone())
        .ok_or_else(|| {
            ExtmanError::Resolution(format!(
                "'{}@{}' has no distribution tarball",
                name, version
            ))
        })?;

    Ok(DistributionInfo {
        name: name.to_string(),
        version: Some(entry.version.clone().unwrap_or(version)),
        tarball_url,
        required_host_version: Some(required),
    })
}
