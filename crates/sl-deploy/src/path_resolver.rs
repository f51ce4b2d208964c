//! Locates the sources and targets of a script creation run.

use crate::error::{DeployError, DeployResult};
use crate::fs::FileSystemAccess;
use sl_core::paths::{dacpac_file_name, directory_paths, shared_dacpac_file_name, target_paths};
use sl_core::{
    ConfigurationModel, CreationMode, DeploySourcePaths, PathCollection, ResolvedVersion,
    SqlProject,
};
use std::path::{Path, PathBuf};

const PUBLISH_PROFILE_PATTERN: &str = "*.publish.xml";

/// Builds the [`PathCollection`] for a run, checking that every source exists
pub struct PathResolver<'a> {
    fs: &'a dyn FileSystemAccess,
}

impl<'a> PathResolver<'a> {
    pub fn new(fs: &'a dyn FileSystemAccess) -> Self {
        Self { fs }
    }

    pub async fn resolve(
        &self,
        project: &SqlProject,
        configuration: &ConfigurationModel,
        version: &ResolvedVersion,
        mode: CreationMode,
    ) -> DeployResult<PathCollection> {
        let project_directory = project.directory()?;
        let sql_target_name = project.sql_target_name()?;

        let directories = directory_paths(
            project_directory,
            configuration.artifacts_path(),
            &version.formatted,
        );
        let targets = target_paths(
            &directories,
            mode,
            sql_target_name,
            &version.formatted,
            version.formatted_previous.as_deref(),
        );

        let new_dacpac_path = project
            .binary_directory()?
            .join(dacpac_file_name(sql_target_name));
        self.require(&new_dacpac_path, "New DACPAC").await?;

        let publish_profile_path = self
            .publish_profile(project_directory, configuration, sql_target_name)
            .await?;

        let previous_dacpac_path = match version.formatted_previous.as_deref() {
            Some(previous) => Some(
                self.previous_dacpac(project_directory, configuration, sql_target_name, previous)
                    .await?,
            ),
            None => None,
        };

        let paths = PathCollection::new(
            directories,
            DeploySourcePaths {
                new_dacpac_path,
                publish_profile_path,
                previous_dacpac_path,
            },
            targets,
        );
        log::debug!(
            "Resolved deploy script path {}",
            paths.targets.deploy_script_path.display()
        );
        Ok(paths)
    }

    async fn publish_profile(
        &self,
        project_directory: &Path,
        configuration: &ConfigurationModel,
        sql_target_name: &str,
    ) -> DeployResult<PathBuf> {
        if !configuration.uses_single_publish_profile() {
            let path = project_directory.join(configuration.publish_profile_path());
            self.require(&path, "Publish profile").await?;
            return Ok(path);
        }

        let mut profiles = self
            .fs
            .find_files(project_directory, PUBLISH_PROFILE_PATTERN)
            .await?;
        if profiles.len() == 1 {
            return Ok(profiles.remove(0));
        }
        if profiles.is_empty() {
            return Err(DeployError::NoPublishProfile {
                directory: project_directory.to_path_buf(),
            });
        }

        let expected = format!("{sql_target_name}.publish.xml");
        let count = profiles.len();
        profiles
            .into_iter()
            .find(|p| {
                p.file_name()
                    .is_some_and(|name| name.to_string_lossy().eq_ignore_ascii_case(&expected))
            })
            .ok_or_else(|| DeployError::AmbiguousPublishProfile {
                directory: project_directory.to_path_buf(),
                count,
                expected,
            })
    }

    async fn previous_dacpac(
        &self,
        project_directory: &Path,
        configuration: &ConfigurationModel,
        sql_target_name: &str,
        formatted_previous: &str,
    ) -> DeployResult<PathBuf> {
        let path = match configuration.shared_dacpac_repository_path() {
            Some(repository) if !repository.trim().is_empty() => Path::new(repository)
                .join(shared_dacpac_file_name(sql_target_name, formatted_previous)),
            _ => project_directory
                .join(configuration.artifacts_path())
                .join(formatted_previous)
                .join(dacpac_file_name(sql_target_name)),
        };
        self.require(&path, "Previous DACPAC").await?;
        Ok(path)
    }

    async fn require(&self, path: &Path, description: &'static str) -> DeployResult<()> {
        if self.fs.exists(path).await {
            Ok(())
        } else {
            Err(DeployError::MissingArtifact {
                description,
                path: path.to_path_buf(),
            })
        }
    }
}

#[cfg(test)]
#[path = "path_resolver_test.rs"]
mod tests;
