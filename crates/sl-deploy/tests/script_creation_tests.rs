//! End-to-end script creation tests for SSDT Lifecycle

use sl_core::{ConfigurationModel, CreationMode, SqlProject, Version};
use sl_deploy::{
    ConfigurationService, CreationState, GenerationRequest, LocalFileSystem, LogErrorSink,
    ScriptCreationService,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn raw_script() -> String {
    std::fs::read_to_string("tests/fixtures/raw_deploy.sql").unwrap()
}

fn create_project(root: &Path) -> SqlProject {
    let project_directory = root.join("Database");
    let binary_directory = project_directory.join("bin").join("Release");
    std::fs::create_dir_all(&binary_directory).unwrap();
    std::fs::write(binary_directory.join("Database.dacpac"), "build output").unwrap();
    std::fs::write(project_directory.join("Database.publish.xml"), "<Project />").unwrap();

    let mut project = SqlProject::new(
        "Database",
        project_directory.join("Database.sqlproj"),
        "Database",
    );
    project.properties.sql_target_name = Some("Database".to_string());
    project.properties.binary_directory = Some(binary_directory);
    project
}

fn service() -> ScriptCreationService {
    ScriptCreationService::new(
        Arc::new(LocalFileSystem),
        Arc::new(LogErrorSink),
        CreationState::new(),
    )
}

/// Two consecutive releases: the second finds the first release's DACPAC
#[tokio::test]
async fn test_consecutive_versioned_releases() {
    let dir = tempfile::tempdir().unwrap();
    let mut project = create_project(dir.path());
    let configurations = ConfigurationService::new(Arc::new(LocalFileSystem));

    let mut configuration = configurations.load_or_default(&project).await.unwrap();
    configuration.set_replace_unnamed_default_constraint_drops(true);
    configuration.set_track_dacpac_version(true);
    configuration.set_remove_sql_cmd_statements(true);
    configuration.set_custom_header(Some("-- Release script".to_string()));
    configurations.save(&project, &configuration).await.unwrap();
    let configuration = configurations.load_or_default(&project).await.unwrap();

    let raw = raw_script();
    let service = service();

    project.properties.dac_version = Some(Version::with_build(1, 0, 0));
    let (first, _) = service
        .create(GenerationRequest {
            project: &project,
            configuration: &configuration,
            previous_version: None,
            raw_script: &raw,
            mode: CreationMode::Versioned,
        })
        .await
        .unwrap();
    let artifacts = dir.path().join("Database").join("_Deployment");
    assert_eq!(
        first.paths.targets.deploy_script_path,
        artifacts.join("1.0.0").join("Database_1.0.0.sql")
    );
    assert!(artifacts.join("1.0.0").join("Database.dacpac").exists());

    let previous = Version::with_build(1, 0, 0);
    project.properties.dac_version = Some(Version::with_build(1, 1, 0));
    let (second, persisted) = service
        .create(GenerationRequest {
            project: &project,
            configuration: &configuration,
            previous_version: Some(&previous),
            raw_script: &raw,
            mode: CreationMode::Versioned,
        })
        .await
        .unwrap();

    assert_eq!(
        persisted.script_path,
        artifacts.join("1.1.0").join("Database_1.0.0_1.1.0.sql")
    );
    assert_eq!(
        second.paths.sources.previous_dacpac_path,
        Some(artifacts.join("1.0.0").join("Database.dacpac"))
    );

    let script = std::fs::read_to_string(&persisted.script_path).unwrap();
    assert!(script.starts_with("IF OBJECT_ID(N'[dbo].[__DacpacVersion]', N'U') IS NULL"));
    assert!(script.contains("-- Release script\r\n/*\r\nDeployment script for Database"));
    assert!(!script.contains(":setvar"));
    assert!(!script.contains(":on error exit"));
    assert!(!script.contains("USE [$(DatabaseName)]"));
    assert!(!script.contains("DROP CONSTRAINT ;"));
    assert!(script.contains("[sys].[default_constraints]"));
    assert!(script.contains(
        "COLUMNPROPERTY(OBJECT_ID(N'[dbo].[Author]'), N'LastName', 'ColumnId')"
    ));
    assert!(script.contains("ALTER TABLE [dbo].[Author]\r\n    ADD DEFAULT N'' FOR [LastName];"));
    assert!(script.contains("ALTER TABLE [dbo].[Author] ALTER COLUMN [LastName]"));
    assert!(script.contains("NULLIF(0, -1)"));
    assert!(script.contains("\r\nGO\r\n"));
}

#[tokio::test]
async fn test_latest_script_with_commented_drops() {
    let dir = tempfile::tempdir().unwrap();
    let mut project = create_project(dir.path());
    project.properties.dac_version = Some(Version::new(2, 0));

    let mut configuration = ConfigurationModel::default();
    configuration.set_comment_out_unnamed_default_constraint_drops(true);
    configuration.set_version_pattern("{MAJOR}.{MINOR}.{BUILD}.{REVISION}");

    let raw = raw_script();
    let (generated, persisted) = service()
        .create(GenerationRequest {
            project: &project,
            configuration: &configuration,
            previous_version: None,
            raw_script: &raw,
            mode: CreationMode::Latest,
        })
        .await
        .unwrap();

    assert_eq!(generated.version.formatted, "2.0");
    let latest: PathBuf = dir
        .path()
        .join("Database")
        .join("_Deployment")
        .join("latest");
    assert_eq!(persisted.script_path, latest.join("Database_latest.sql"));
    assert!(generated
        .script
        .contains("-- ALTER TABLE [dbo].[Author] DROP CONSTRAINT ;"));
    assert!(generated
        .script
        .contains("-- PRINT N'Dropping unnamed constraint on [dbo].[Author]...';"));
    assert!(generated.script.contains(":setvar DatabaseName"));
}
