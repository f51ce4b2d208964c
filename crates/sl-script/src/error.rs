//! Error types for sl-script

use sl_core::CoreError;
use thiserror::Error;

/// Script modification errors
#[derive(Error, Debug)]
pub enum ScriptError {
    /// S001: A modifier needs an input that was not supplied
    #[error("[S001] Missing argument: {name}")]
    MissingArgument { name: &'static str },

    /// S002: Tracking template could not be rendered
    #[error("[S002] Template render error: {0}")]
    RenderError(String),

    /// S003: Pipeline requested for a configuration with validation errors
    #[error("[S003] Cannot build modifier pipeline, configuration is invalid: {}", errors.join(" "))]
    InvalidConfiguration { errors: Vec<String> },

    /// Core error that is not an argument problem
    #[error(transparent)]
    Core(CoreError),
}

/// Result type alias for ScriptError
pub type ScriptResult<T> = Result<T, ScriptError>;

impl From<minijinja::Error> for ScriptError {
    fn from(err: minijinja::Error) -> Self {
        ScriptError::RenderError(err.to_string())
    }
}

impl From<CoreError> for ScriptError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingArgument { name } => ScriptError::MissingArgument { name },
            other => ScriptError::Core(other),
        }
    }
}
