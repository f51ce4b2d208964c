//! Error types for sl-deploy

use sl_core::CoreError;
use sl_script::ScriptError;
use std::path::PathBuf;
use thiserror::Error;

/// Script creation and persistence errors
#[derive(Error, Debug)]
pub enum DeployError {
    /// D001: An artifact the run depends on is not on disk
    #[error("[D001] {description} not found: {}", path.display())]
    MissingArtifact {
        description: &'static str,
        path: PathBuf,
    },

    /// D002: No publish profile could be discovered
    #[error("[D002] No *.publish.xml profile found in {}", directory.display())]
    NoPublishProfile { directory: PathBuf },

    /// D003: Several publish profiles and none named after the target
    #[error("[D003] Found {count} publish profiles in {} and none named {expected}; set publishProfilePath", directory.display())]
    AmbiguousPublishProfile {
        directory: PathBuf,
        count: usize,
        expected: String,
    },

    /// D004: File system operation failed
    #[error("[D004] I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// D005: Persisted configuration could not be parsed
    #[error("[D005] Invalid configuration file {}: {source}", path.display())]
    ConfigurationFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// D006: File search pattern is malformed
    #[error("[D006] Invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// Result type alias for DeployError
pub type DeployResult<T> = Result<T, DeployError>;

impl DeployError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeployError::Io {
            path: path.into(),
            source,
        }
    }
}
