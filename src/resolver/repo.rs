//! Source-repository resolution
//!
//! Only repositories on the one trusted source-hosting domain are accepted.
//! The default-branch package descriptor is fetched from the raw-content
//! host, and the tarball URL is synthesized from the hosting service's
//! archive endpoint. Arbitrary repositories carry no guaranteed metadata, so
//! unlike registry resolution nothing beyond the name is mandatory: the
//! descriptor is used as-is.

use crate::constants::{DESCRIPTOR_FILE, urls};
use crate::core::types::{DistributionInfo, PackageDescriptor};
use crate::error::{ExtmanError, Result};
use crate::remote::Fetcher;
use crate::utils::sanitize;

pub fn resolve(fetcher: &dyn Fetcher, url: &str) -> Result<DistributionInfo> {
    let url = normalize(url);
    if !is_trusted(&url) {
        return Err(ExtmanError::Resolution(format!(
            "Source-repository installs are not supported for '{}': only {} repositories are accepted",
            url,
            urls::GITHUB_HOST
        )));
    }

    let document = fetcher.fetch_json(&raw_descriptor_url(&url))?;
    let descriptor = PackageDescriptor::from_value(document)?;

    let name = descriptor.name.clone().ok_or_else(|| {
        ExtmanError::Resolution(format!("Descriptor at '{}' declares no name", url))
    })?;
    sanitize::validate_extension_name(&name)?;

    Ok(DistributionInfo {
        name,
        version: descriptor.version.clone(),
        tarball_url: tarball_url(&url),
        required_host_version: descriptor.host_requirement().map(str::to_string),
    })
}

pub(crate) fn normalize(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn is_trusted(url: &str) -> bool {
    url.strip_prefix(urls::GITHUB_HOST)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Raw-content URL of the default-branch package descriptor.
pub(crate) fn raw_descriptor_url(url: &str) -> String {
    format!(
        "{}/{}/{}",
        url.replacen(urls::GITHUB_HOST, urls::GITHUB_RAW_HOST, 1),
        urls::DEFAULT_BRANCH,
        DESCRIPTOR_FILE
    )
}

/// Archive endpoint for the default branch.
pub(crate) fn tarball_url(url: &str) -> String {
    format!("{}/archive/{}.tar.gz", url, urls::DEFAULT_BRANCH)
}
