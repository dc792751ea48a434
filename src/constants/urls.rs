/// External URLs and URL patterns
///
/// Centralized endpoints for:
/// - Default extension registry (npm-style)
/// - The one trusted source-repository host (GitHub) and its raw-content twin
///
/// Default extension registry.
///
/// Overridable with `EXTMAN_REGISTRY`. The registry speaks the npm wire
/// contract: `GET <registry>/<name>` returns a document with `dist-tags`,
/// `versions.<ver>.dist.tarball` and `versions.<ver>.engines`.
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// Web-UI host of the trusted source-repository domain. Only references
/// under this host are accepted for source-repository installs.
pub const GITHUB_HOST: &str = "https://github.com";

/// Raw-content twin of [`GITHUB_HOST`], used to fetch the default-branch
/// package descriptor without cloning.
pub const GITHUB_RAW_HOST: &str = "https://raw.githubusercontent.com";

/// Branch assumed for source-repository references.
pub const DEFAULT_BRANCH: &str = "master";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_no_trailing_slash() {
        assert!(!DEFAULT_REGISTRY.ends_with('/'));
    }

    #[test]
    fn raw_host_mirrors_web_host_scheme() {
        assert!(GITHUB_HOST.starts_with("https://"));
        assert!(GITHUB_RAW_HOST.starts_with("https://"));
    }
}
