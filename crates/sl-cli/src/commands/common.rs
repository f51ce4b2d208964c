//! Shared utilities for CLI commands

use anyhow::{bail, Context, Result};
use glob::Pattern;
use sl_core::SqlProject;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Default build output directory, relative to the project directory
pub(crate) const DEFAULT_BINARY_DIRECTORY: &str = "bin/Release";

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main.rs maps it to the process exit code.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Locate the `.sqlproj` file named on the command line, or the single one
/// in the current directory
pub(crate) fn project_file(global: &GlobalArgs) -> Result<PathBuf> {
    if let Some(path) = &global.project {
        if !path.is_file() {
            bail!("Project file {} does not exist", path.display());
        }
        return Ok(path.clone());
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    find_single_project(&cwd)
}

pub(crate) fn find_single_project(directory: &Path) -> Result<PathBuf> {
    let pattern = Path::new(&Pattern::escape(&directory.to_string_lossy()))
        .join("*.sqlproj")
        .to_string_lossy()
        .into_owned();
    let mut projects: Vec<PathBuf> = glob::glob(&pattern)
        .context("Invalid project search pattern")?
        .filter_map(|entry| entry.ok())
        .collect();

    match projects.len() {
        1 => Ok(projects.remove(0)),
        0 => bail!(
            "No .sqlproj file found in {}; pass --project",
            directory.display()
        ),
        n => bail!(
            "Found {n} .sqlproj files in {}; pass --project",
            directory.display()
        ),
    }
}

/// Build the project identity for a `.sqlproj` file.
///
/// Properties are left empty; commands that need them fill them in.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<SqlProject> {
    let file = project_file(global)?;
    let full_name = std::path::absolute(&file)
        .with_context(|| format!("Failed to resolve {}", file.display()))?;
    let name = full_name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .context("Project file has no name")?;
    let unique_name = full_name.to_string_lossy().into_owned();
    log::debug!("Using project {}", full_name.display());
    Ok(SqlProject::new(name, full_name, unique_name))
}

/// Print validation errors to stderr, one per line
pub(crate) fn print_errors(errors: &[String]) {
    for error in errors {
        eprintln!("  {error}");
    }
}
