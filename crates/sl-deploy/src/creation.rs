//! Script creation orchestration.
//!
//! A run resolves the target version, then the paths, then applies the
//! modifier pipeline to the raw script. Nothing is written until every one
//! of those steps has succeeded.

use crate::error::DeployResult;
use crate::error_sink::{report, ErrorSink};
use crate::fs::FileSystemAccess;
use crate::path_resolver::PathResolver;
use crate::state::CreationState;
use sl_core::paths::{dacpac_file_name, shared_dacpac_file_name};
use sl_core::{
    ConfigurationModel, CoreError, CreationMode, PathCollection, ResolvedVersion, SqlProject,
    Version, VersionResolver,
};
use sl_script::{ModifierContext, ModifierPipeline};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const REFACTORLOG_PATTERN: &str = "*.refactorlog";

/// Inputs for one script creation run
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub project: &'a SqlProject,
    pub configuration: &'a ConfigurationModel,
    /// Previously deployed version, absent for a first deployment
    pub previous_version: Option<&'a Version>,
    /// Deployment script produced by the build
    pub raw_script: &'a str,
    pub mode: CreationMode,
}

/// Final script plus everything needed to persist it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    pub script: String,
    pub paths: PathCollection,
    pub version: ResolvedVersion,
    pub mode: CreationMode,
}

/// Files touched while persisting a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedArtifacts {
    pub script_path: PathBuf,
    pub copied: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
}

/// Runs script creation against a file-system collaborator
pub struct ScriptCreationService {
    fs: Arc<dyn FileSystemAccess>,
    sink: Arc<dyn ErrorSink>,
    state: CreationState,
}

impl ScriptCreationService {
    pub fn new(
        fs: Arc<dyn FileSystemAccess>,
        sink: Arc<dyn ErrorSink>,
        state: CreationState,
    ) -> Self {
        Self { fs, sink, state }
    }

    /// In-progress flag raised while this service runs
    pub fn state(&self) -> &CreationState {
        &self.state
    }

    /// Produce the final script without writing anything
    pub async fn generate(&self, request: GenerationRequest<'_>) -> DeployResult<GeneratedScript> {
        let _guard = self.state.begin();
        let result = self.run_generate(request).await;
        self.report_failure(result).await
    }

    /// Write a generated script and apply the post-generation file operations
    pub async fn persist(
        &self,
        project: &SqlProject,
        configuration: &ConfigurationModel,
        generated: &GeneratedScript,
    ) -> DeployResult<PersistedArtifacts> {
        let _guard = self.state.begin();
        let result = self.run_persist(project, configuration, generated).await;
        self.report_failure(result).await
    }

    /// Generate and persist as one run
    pub async fn create(
        &self,
        request: GenerationRequest<'_>,
    ) -> DeployResult<(GeneratedScript, PersistedArtifacts)> {
        let _guard = self.state.begin();
        let result: DeployResult<_> = async {
            let generated = self.run_generate(request).await?;
            let persisted = self
                .run_persist(request.project, request.configuration, &generated)
                .await?;
            Ok((generated, persisted))
        }
        .await;
        self.report_failure(result).await
    }

    async fn run_generate(&self, request: GenerationRequest<'_>) -> DeployResult<GeneratedScript> {
        let project = request.project;
        let configuration = request.configuration.clone();
        if configuration.has_errors() {
            return Err(CoreError::ConfigInvalid {
                errors: configuration.error_messages(),
            }
            .into());
        }

        let resolver = VersionResolver::new(configuration.version_pattern())?;
        let version = resolver.resolve(project.dac_version()?, request.previous_version)?;

        let paths = PathResolver::new(self.fs.as_ref())
            .resolve(project, &configuration, &version, request.mode)
            .await?;

        let pipeline = ModifierPipeline::from_configuration(&configuration)?;
        let ctx = ModifierContext::new(project, &configuration, &paths);
        let script = pipeline.apply(request.raw_script, &ctx)?;

        log::info!(
            "Created {} script for {} version {}",
            request.mode,
            project.name,
            version.formatted
        );
        Ok(GeneratedScript {
            script,
            paths,
            version,
            mode: request.mode,
        })
    }

    async fn run_persist(
        &self,
        project: &SqlProject,
        configuration: &ConfigurationModel,
        generated: &GeneratedScript,
    ) -> DeployResult<PersistedArtifacts> {
        let sql_target_name = project.sql_target_name()?;
        let paths = &generated.paths;
        let script_path = paths.targets.deploy_script_path.clone();
        self.fs.write(&script_path, &generated.script).await?;

        let mut artifacts = PersistedArtifacts {
            script_path,
            ..PersistedArtifacts::default()
        };

        let dacpac_copy = paths
            .output_directory(generated.mode)
            .join(dacpac_file_name(sql_target_name));
        self.fs
            .copy(&paths.sources.new_dacpac_path, &dacpac_copy)
            .await?;
        artifacts.copied.push(dacpac_copy);

        if let Some(repository) = configuration
            .shared_dacpac_repository_path()
            .filter(|r| !r.trim().is_empty())
        {
            let shared_copy = Path::new(repository)
                .join(shared_dacpac_file_name(sql_target_name, &generated.version.formatted));
            self.fs
                .copy(&paths.sources.new_dacpac_path, &shared_copy)
                .await?;
            artifacts.copied.push(shared_copy);
        }

        if generated.mode == CreationMode::Versioned {
            if configuration.delete_refactorlog_after_versioned_script_generation() {
                let refactorlogs = self
                    .fs
                    .find_files(&paths.directories.project_directory, REFACTORLOG_PATTERN)
                    .await?;
                for refactorlog in refactorlogs {
                    self.fs.remove_file(&refactorlog).await?;
                    artifacts.deleted.push(refactorlog);
                }
            }
            if configuration.delete_latest_after_versioned_script_generation() {
                let latest = &paths.directories.latest_artifacts_directory;
                if self.fs.exists(latest).await {
                    self.fs.remove_dir_all(latest).await?;
                    artifacts.deleted.push(latest.clone());
                }
            }
        }

        log::info!(
            "Wrote deploy script {}",
            artifacts.script_path.display()
        );
        Ok(artifacts)
    }

    async fn report_failure<T>(&self, result: DeployResult<T>) -> DeployResult<T> {
        if let Err(e) = &result {
            report(self.sink.as_ref(), &e.to_string()).await;
        }
        result
    }
}

#[cfg(test)]
#[path = "creation_test.rs"]
mod tests;
