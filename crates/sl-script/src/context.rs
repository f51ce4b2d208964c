//! Inputs shared by every modifier in a run

use crate::error::{ScriptError, ScriptResult};
use sl_core::{ConfigurationModel, PathCollection, SqlProject};

/// Line break emitted by every modifier
pub const LINE_BREAK: &str = "\r\n";

/// Project, configuration and paths for one script creation run.
///
/// The configuration is expected to be a snapshot taken for the run.
#[derive(Debug, Clone, Copy)]
pub struct ModifierContext<'a> {
    pub project: &'a SqlProject,
    pub configuration: &'a ConfigurationModel,
    pub paths: &'a PathCollection,
}

impl<'a> ModifierContext<'a> {
    pub fn new(
        project: &'a SqlProject,
        configuration: &'a ConfigurationModel,
        paths: &'a PathCollection,
    ) -> Self {
        Self {
            project,
            configuration,
            paths,
        }
    }

    /// Fail before any work when the project has no name
    pub(crate) fn require_project_name(&self) -> ScriptResult<&'a str> {
        let name = self.project.name.as_str();
        if name.trim().is_empty() {
            return Err(ScriptError::MissingArgument {
                name: "project name",
            });
        }
        Ok(name)
    }
}
