//! Error types for sl-core

use thiserror::Error;

/// Core error type for SSDT Lifecycle
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration has validation errors
    #[error("[C001] Configuration is invalid: {}", errors.join(" "))]
    ConfigInvalid { errors: Vec<String> },

    /// C002: Version pattern cannot be rendered
    #[error("[C002] Invalid version pattern '{pattern}': {}", errors.join(" "))]
    InvalidVersionPattern {
        pattern: String,
        errors: Vec<String>,
    },

    /// C003: New version does not advance past the previous one
    #[error("[C003] Version {new} must be greater than the previously deployed version {previous}")]
    VersionNotAdvanced { new: String, previous: String },

    /// C004: Version string could not be parsed
    #[error("[C004] Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    /// C005: A required input was not supplied
    #[error("[C005] Missing argument: {name}")]
    MissingArgument { name: &'static str },

    /// C006: Unknown configuration field or unparsable field value
    #[error("[C006] Invalid value for '{field}': {reason}")]
    InvalidFieldValue { field: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
