//! SQL database project identity

use crate::error::{CoreError, CoreResult};
use crate::version::Version;
use std::path::{Path, PathBuf};

/// Properties filled in by the external build/load step.
///
/// All fields start empty; consumers fail with
/// [`CoreError::MissingArgument`] when the value they need was never loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectProperties {
    /// Name of the produced DACPAC and of the tracked database object
    pub sql_target_name: Option<String>,
    /// Build output directory containing the DACPAC
    pub binary_directory: Option<PathBuf>,
    /// Version stamped into the DACPAC by the build
    pub dac_version: Option<Version>,
}

/// A SQL database project (`*.sqlproj`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlProject {
    /// Display name
    pub name: String,
    /// Absolute path of the `.sqlproj` file
    pub full_name: PathBuf,
    /// Unique name used to key per-project state
    pub unique_name: String,
    /// Build-derived properties
    pub properties: ProjectProperties,
}

impl SqlProject {
    /// Create a project with empty properties
    pub fn new(
        name: impl Into<String>,
        full_name: impl Into<PathBuf>,
        unique_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            unique_name: unique_name.into(),
            properties: ProjectProperties::default(),
        }
    }

    /// Directory holding the `.sqlproj` file
    pub fn directory(&self) -> CoreResult<&Path> {
        self.full_name
            .parent()
            .ok_or(CoreError::MissingArgument {
                name: "project directory",
            })
    }

    /// SQL target name, failing when it was not loaded or is blank
    pub fn sql_target_name(&self) -> CoreResult<&str> {
        self.properties
            .sql_target_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or(CoreError::MissingArgument {
                name: "sql target name",
            })
    }

    /// DAC version, failing when it was not loaded
    pub fn dac_version(&self) -> CoreResult<&Version> {
        self.properties
            .dac_version
            .as_ref()
            .ok_or(CoreError::MissingArgument { name: "dac version" })
    }

    /// Build output directory, failing when it was not loaded
    pub fn binary_directory(&self) -> CoreResult<&Path> {
        self.properties
            .binary_directory
            .as_deref()
            .ok_or(CoreError::MissingArgument {
                name: "binary directory",
            })
    }
}
