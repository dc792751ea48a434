use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtmanError {
    /// Reference could not be mapped to a valid extension (bad reference,
    /// unreachable registry, malformed or incompatible-by-omission package)
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Host version does not satisfy the extension's declared range
    #[error("Extension '{name}' requires host version {required}, current is {host}")]
    IncompatibleHost {
        name: String,
        required: String,
        host: String,
    },

    /// Archive fetch or extraction failure
    #[error("Download failed: {0}")]
    Download(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// Existing manifest is unparsable; never silently replaced
    #[error("Manifest at '{path}' is corrupt: {reason}")]
    ManifestCorrupt { path: PathBuf, reason: String },

    #[error("System command '{command}' failed: {reason}")]
    SystemCommandFailed { command: String, reason: String },

    #[error("System dependency missing: {0}")]
    DependencyMissing(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Path resolution or validation error
    #[error("Path error: {0}")]
    PathError(String),

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ExtmanError>;
