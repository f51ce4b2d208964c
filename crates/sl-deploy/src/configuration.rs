//! Loading and saving the per-project configuration file

use crate::error::{DeployError, DeployResult};
use crate::fs::FileSystemAccess;
use sl_core::{ConfigurationModel, ConfigurationSettings, CoreError, SqlProject};
use std::path::PathBuf;
use std::sync::Arc;

/// Directory below the project directory holding the configuration file
pub const CONFIGURATION_DIRECTORY: &str = "Properties";

/// Configuration file name
pub const CONFIGURATION_FILE_NAME: &str = "ssdtlifecycle.json";

/// Path of the configuration file for a project
pub fn configuration_path(project: &SqlProject) -> DeployResult<PathBuf> {
    Ok(project
        .directory()?
        .join(CONFIGURATION_DIRECTORY)
        .join(CONFIGURATION_FILE_NAME))
}

/// Reads and writes [`ConfigurationModel`]s through the file-system collaborator
#[derive(Clone)]
pub struct ConfigurationService {
    fs: Arc<dyn FileSystemAccess>,
}

impl ConfigurationService {
    pub fn new(fs: Arc<dyn FileSystemAccess>) -> Self {
        Self { fs }
    }

    /// Load the persisted configuration, or the defaults when none was saved.
    ///
    /// The result is validated; an invalid file still loads so it can be
    /// corrected.
    pub async fn load_or_default(&self, project: &SqlProject) -> DeployResult<ConfigurationModel> {
        let path = configuration_path(project)?;
        if !self.fs.exists(&path).await {
            log::debug!(
                "No configuration at {}, using defaults",
                path.display()
            );
            return Ok(ConfigurationModel::default());
        }

        let content = self.fs.read_to_string(&path).await?;
        let settings: ConfigurationSettings = serde_json::from_str(&content)
            .map_err(|source| DeployError::ConfigurationFile {
                path: path.clone(),
                source,
            })?;
        let model = ConfigurationModel::from_settings(settings);
        if model.has_errors() {
            log::warn!(
                "Configuration at {} has validation errors",
                path.display()
            );
        }
        Ok(model)
    }

    /// Validate `configuration` and persist it only when it is valid.
    pub async fn save(
        &self,
        project: &SqlProject,
        configuration: &ConfigurationModel,
    ) -> DeployResult<PathBuf> {
        let snapshot = configuration.clone();
        if snapshot.has_errors() {
            return Err(CoreError::ConfigInvalid {
                errors: snapshot.error_messages(),
            }
            .into());
        }

        let path = configuration_path(project)?;
        let json = serde_json::to_string_pretty(snapshot.settings()).map_err(CoreError::from)?;
        self.fs.write(&path, &json).await?;
        log::info!("Saved configuration to {}", path.display());
        Ok(path)
    }
}
