//! File-system locations used by a single script creation run.
//!
//! A [`PathCollection`] is built once per run after the target version has
//! been resolved and is never mutated afterwards.

use std::path::{Path, PathBuf};

/// Name of the directory that always holds the most recent "latest" output
pub const LATEST_DIRECTORY_NAME: &str = "latest";

/// Whether a run produces the rolling "latest" output or a versioned release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreationMode {
    /// Output to the `latest` directory, overwritten on every run
    Latest,
    /// Output to a directory named after the formatted target version
    #[default]
    Versioned,
}

impl std::fmt::Display for CreationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreationMode::Latest => write!(f, "latest"),
            CreationMode::Versioned => write!(f, "versioned"),
        }
    }
}

/// Directories involved in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPaths {
    /// Directory containing the `.sqlproj` file
    pub project_directory: PathBuf,
    /// `<artifacts>/latest`
    pub latest_artifacts_directory: PathBuf,
    /// `<artifacts>/<formatted version>`
    pub new_artifacts_directory: PathBuf,
}

/// Inputs consumed by the deployment tooling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySourcePaths {
    /// DACPAC produced by the build
    pub new_dacpac_path: PathBuf,
    /// Publish profile describing the target environment
    pub publish_profile_path: PathBuf,
    /// DACPAC of the previously deployed version, if there is one
    pub previous_dacpac_path: Option<PathBuf>,
}

/// Outputs written by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTargetPaths {
    /// Final deployment script
    pub deploy_script_path: PathBuf,
    /// Deployment report
    pub deploy_report_path: PathBuf,
}

/// All paths for one script creation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCollection {
    pub directories: DirectoryPaths,
    pub sources: DeploySourcePaths,
    pub targets: DeployTargetPaths,
}

impl PathCollection {
    pub fn new(
        directories: DirectoryPaths,
        sources: DeploySourcePaths,
        targets: DeployTargetPaths,
    ) -> Self {
        Self {
            directories,
            sources,
            targets,
        }
    }

    /// Directory the run writes into for the given mode
    pub fn output_directory(&self, mode: CreationMode) -> &Path {
        match mode {
            CreationMode::Latest => &self.directories.latest_artifacts_directory,
            CreationMode::Versioned => &self.directories.new_artifacts_directory,
        }
    }
}

/// Compute the directory paths for a project.
pub fn directory_paths(
    project_directory: &Path,
    artifacts_path: &str,
    formatted_version: &str,
) -> DirectoryPaths {
    let artifacts_root = project_directory.join(artifacts_path);
    DirectoryPaths {
        project_directory: project_directory.to_path_buf(),
        latest_artifacts_directory: artifacts_root.join(LATEST_DIRECTORY_NAME),
        new_artifacts_directory: artifacts_root.join(formatted_version),
    }
}

/// Compute the deploy script and report paths.
///
/// The file stem is `{target}_{previous}_{version}`, with `latest` in place
/// of the version for [`CreationMode::Latest`] and without the previous
/// part for a first deployment.
pub fn target_paths(
    directories: &DirectoryPaths,
    mode: CreationMode,
    sql_target_name: &str,
    formatted_version: &str,
    formatted_previous: Option<&str>,
) -> DeployTargetPaths {
    let (directory, version_part) = match mode {
        CreationMode::Latest => (
            &directories.latest_artifacts_directory,
            LATEST_DIRECTORY_NAME,
        ),
        CreationMode::Versioned => (&directories.new_artifacts_directory, formatted_version),
    };
    let stem = match formatted_previous {
        Some(previous) => format!("{sql_target_name}_{previous}_{version_part}"),
        None => format!("{sql_target_name}_{version_part}"),
    };
    DeployTargetPaths {
        deploy_script_path: directory.join(format!("{stem}.sql")),
        deploy_report_path: directory.join(format!("{stem}_DeployReport.xml")),
    }
}

/// File name of a DACPAC inside an artifacts directory
pub fn dacpac_file_name(sql_target_name: &str) -> String {
    format!("{sql_target_name}.dacpac")
}

/// File name of a DACPAC inside the shared repository
pub fn shared_dacpac_file_name(sql_target_name: &str, formatted_version: &str) -> String {
    format!("{sql_target_name}_{formatted_version}.dacpac")
}

#[cfg(test)]
#[path = "paths_test.rs"]
mod tests;
