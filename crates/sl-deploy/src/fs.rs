//! File system collaborator

use crate::error::{DeployError, DeployResult};
use async_trait::async_trait;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

/// File access used by script creation.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Check whether a file or directory exists
    async fn exists(&self, path: &Path) -> bool;

    async fn read_to_string(&self, path: &Path) -> DeployResult<String>;

    /// Write a file, creating missing parent directories
    async fn write(&self, path: &Path, contents: &str) -> DeployResult<()>;

    /// Copy a file, creating missing parent directories of the destination
    async fn copy(&self, from: &Path, to: &Path) -> DeployResult<()>;

    /// Files directly inside `directory` whose names match `pattern`
    /// (case-insensitive), sorted by path
    async fn find_files(&self, directory: &Path, pattern: &str) -> DeployResult<Vec<PathBuf>>;

    async fn remove_file(&self, path: &Path) -> DeployResult<()>;

    /// Remove a directory and everything below it; missing directories are ignored
    async fn remove_dir_all(&self, path: &Path) -> DeployResult<()>;
}

/// [`FileSystemAccess`] backed by the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    async fn ensure_parent(path: &Path) -> DeployResult<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DeployError::io(parent, e)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl FileSystemAccess for LocalFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read_to_string(&self, path: &Path) -> DeployResult<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DeployError::io(path, e))
    }

    async fn write(&self, path: &Path, contents: &str) -> DeployResult<()> {
        Self::ensure_parent(path).await?;
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| DeployError::io(path, e))
    }

    async fn copy(&self, from: &Path, to: &Path) -> DeployResult<()> {
        Self::ensure_parent(to).await?;
        tokio::fs::copy(from, to)
            .await
            .map(|_| ())
            .map_err(|e| DeployError::io(from, e))
    }

    async fn find_files(&self, directory: &Path, pattern: &str) -> DeployResult<Vec<PathBuf>> {
        let owned_directory = directory.to_path_buf();
        let owned_pattern = pattern.to_string();
        // glob walks the directory synchronously
        tokio::task::spawn_blocking(move || scan_directory(&owned_directory, &owned_pattern))
            .await
            .map_err(|e| DeployError::io(directory, std::io::Error::other(e)))?
    }

    async fn remove_file(&self, path: &Path) -> DeployResult<()> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| DeployError::io(path, e))
    }

    async fn remove_dir_all(&self, path: &Path) -> DeployResult<()> {
        match tokio::fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DeployError::io(path, e)),
        }
    }
}

fn scan_directory(directory: &Path, pattern: &str) -> DeployResult<Vec<PathBuf>> {
    let escaped = Pattern::escape(&directory.to_string_lossy());
    let full_pattern = Path::new(&escaped).join(pattern);
    let full_pattern = full_pattern.to_string_lossy();
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let entries =
        glob::glob_with(&full_pattern, options).map_err(|e| DeployError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("Skipping unreadable entry: {e}"),
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("script.sql");
        let fs = LocalFileSystem;

        fs.write(&path, "SELECT 1;").await.unwrap();
        assert!(fs.exists(&path).await);
        assert_eq!(fs.read_to_string(&path).await.unwrap(), "SELECT 1;");
    }

    #[tokio::test]
    async fn test_find_files_is_case_insensitive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.publish.xml"), "").unwrap();
        std::fs::write(dir.path().join("A.PUBLISH.XML"), "").unwrap();
        std::fs::write(dir.path().join("c.xml"), "").unwrap();
        std::fs::create_dir(dir.path().join("d.publish.xml")).unwrap();

        let files = LocalFileSystem
            .find_files(dir.path(), "*.publish.xml")
            .await
            .unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A.PUBLISH.XML", "b.publish.xml"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_find_files_runs_off_the_worker_thread() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Database.refactorlog"), "").unwrap();
        let fs = LocalFileSystem;

        let out_path = dir.path().join("out").join("script.sql");
        let (found, written) = tokio::join!(
            fs.find_files(dir.path(), "*.refactorlog"),
            fs.write(&out_path, "GO"),
        );
        assert_eq!(found.unwrap(), vec![dir.path().join("Database.refactorlog")]);
        written.unwrap();
    }

    #[tokio::test]
    async fn test_find_files_reports_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFileSystem
            .find_files(dir.path(), "[*.publish.xml")
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::InvalidPattern { ref pattern, .. } if pattern == "[*.publish.xml"));

        let missing = LocalFileSystem
            .find_files(&dir.path().join("missing"), "*.sql")
            .await
            .unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_directory_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        LocalFileSystem
            .remove_dir_all(&dir.path().join("latest"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_read_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.sql");
        let err = LocalFileSystem.read_to_string(&path).await.unwrap_err();
        assert!(matches!(err, DeployError::Io { path: ref p, .. } if *p == path));
    }
}
