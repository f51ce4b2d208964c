use super::*;
use crate::fs::LocalFileSystem;
use sl_core::{Version, VersionResolver};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    project_directory: PathBuf,
    project: SqlProject,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let project_directory = dir.path().join("Database");
    let binary_directory = project_directory.join("bin").join("Release");
    std::fs::create_dir_all(&binary_directory).unwrap();
    std::fs::write(binary_directory.join("Database.dacpac"), "dacpac").unwrap();
    std::fs::write(project_directory.join("Database.publish.xml"), "<Project />").unwrap();

    let mut project = SqlProject::new(
        "Database",
        project_directory.join("Database.sqlproj"),
        "Database",
    );
    project.properties.sql_target_name = Some("Database".to_string());
    project.properties.binary_directory = Some(binary_directory);
    project.properties.dac_version = Some(Version::with_build(1, 1, 0));

    Fixture {
        _dir: dir,
        project_directory,
        project,
    }
}

fn resolved(previous: Option<Version>) -> ResolvedVersion {
    VersionResolver::new("{MAJOR}.{MINOR}.{BUILD}")
        .unwrap()
        .resolve(&Version::with_build(1, 1, 0), previous.as_ref())
        .unwrap()
}

#[tokio::test]
async fn test_first_versioned_deployment() {
    let fx = fixture();
    let configuration = ConfigurationModel::default();
    let paths = PathResolver::new(&LocalFileSystem)
        .resolve(&fx.project, &configuration, &resolved(None), CreationMode::Versioned)
        .await
        .unwrap();

    let artifacts = fx.project_directory.join("_Deployment");
    assert_eq!(paths.directories.project_directory, fx.project_directory);
    assert_eq!(paths.directories.latest_artifacts_directory, artifacts.join("latest"));
    assert_eq!(paths.directories.new_artifacts_directory, artifacts.join("1.1.0"));
    assert_eq!(
        paths.targets.deploy_script_path,
        artifacts.join("1.1.0").join("Database_1.1.0.sql")
    );
    assert_eq!(
        paths.sources.publish_profile_path,
        fx.project_directory.join("Database.publish.xml")
    );
    assert_eq!(paths.sources.previous_dacpac_path, None);
}

#[tokio::test]
async fn test_previous_dacpac_in_artifacts_directory() {
    let fx = fixture();
    let previous_directory = fx.project_directory.join("_Deployment").join("1.0.0");
    std::fs::create_dir_all(&previous_directory).unwrap();
    std::fs::write(previous_directory.join("Database.dacpac"), "old").unwrap();

    let paths = PathResolver::new(&LocalFileSystem)
        .resolve(
            &fx.project,
            &ConfigurationModel::default(),
            &resolved(Some(Version::with_build(1, 0, 0))),
            CreationMode::Latest,
        )
        .await
        .unwrap();

    assert_eq!(
        paths.sources.previous_dacpac_path,
        Some(previous_directory.join("Database.dacpac"))
    );
    assert_eq!(
        paths.targets.deploy_script_path,
        fx.project_directory
            .join("_Deployment")
            .join("latest")
            .join("Database_1.0.0_latest.sql")
    );
}

#[tokio::test]
async fn test_previous_dacpac_in_shared_repository() {
    let fx = fixture();
    let repository = fx.project_directory.parent().unwrap().join("repository");
    std::fs::create_dir_all(&repository).unwrap();
    std::fs::write(repository.join("Database_1.0.0.dacpac"), "old").unwrap();

    let mut configuration = ConfigurationModel::default();
    configuration.set_shared_dacpac_repository_path(Some(repository.to_string_lossy().into_owned()));
    assert!(!configuration.has_errors());

    let paths = PathResolver::new(&LocalFileSystem)
        .resolve(
            &fx.project,
            &configuration,
            &resolved(Some(Version::with_build(1, 0, 0))),
            CreationMode::Versioned,
        )
        .await
        .unwrap();
    assert_eq!(
        paths.sources.previous_dacpac_path,
        Some(repository.join("Database_1.0.0.dacpac"))
    );
}

#[tokio::test]
async fn test_missing_previous_dacpac_is_reported() {
    let fx = fixture();
    let err = PathResolver::new(&LocalFileSystem)
        .resolve(
            &fx.project,
            &ConfigurationModel::default(),
            &resolved(Some(Version::with_build(1, 0, 0))),
            CreationMode::Versioned,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DeployError::MissingArtifact {
            description: "Previous DACPAC",
            ..
        }
    ));
}

#[tokio::test]
async fn test_missing_new_dacpac_is_reported() {
    let fx = fixture();
    std::fs::remove_file(
        fx.project_directory
            .join("bin")
            .join("Release")
            .join("Database.dacpac"),
    )
    .unwrap();
    let err = PathResolver::new(&LocalFileSystem)
        .resolve(
            &fx.project,
            &ConfigurationModel::default(),
            &resolved(None),
            CreationMode::Versioned,
        )
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("[D001] New DACPAC not found"));
}

#[tokio::test]
async fn test_several_profiles_prefer_target_name() {
    let fx = fixture();
    std::fs::write(fx.project_directory.join("Other.publish.xml"), "").unwrap();

    let paths = PathResolver::new(&LocalFileSystem)
        .resolve(
            &fx.project,
            &ConfigurationModel::default(),
            &resolved(None),
            CreationMode::Versioned,
        )
        .await
        .unwrap();
    assert_eq!(
        paths.sources.publish_profile_path,
        fx.project_directory.join("Database.publish.xml")
    );

    std::fs::remove_file(fx.project_directory.join("Database.publish.xml")).unwrap();
    std::fs::write(fx.project_directory.join("Third.publish.xml"), "").unwrap();
    let err = PathResolver::new(&LocalFileSystem)
        .resolve(
            &fx.project,
            &ConfigurationModel::default(),
            &resolved(None),
            CreationMode::Versioned,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DeployError::AmbiguousPublishProfile { count: 2, .. }
    ));
}

#[tokio::test]
async fn test_no_profile_is_reported() {
    let fx = fixture();
    std::fs::remove_file(fx.project_directory.join("Database.publish.xml")).unwrap();
    let err = PathResolver::new(&LocalFileSystem)
        .resolve(
            &fx.project,
            &ConfigurationModel::default(),
            &resolved(None),
            CreationMode::Versioned,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DeployError::NoPublishProfile { .. }));
}

#[tokio::test]
async fn test_configured_profile_must_exist() {
    let fx = fixture();
    let mut configuration = ConfigurationModel::default();
    configuration.set_publish_profile_path("Profiles/Prod.publish.xml");

    let err = PathResolver::new(&LocalFileSystem)
        .resolve(&fx.project, &configuration, &resolved(None), CreationMode::Versioned)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DeployError::MissingArtifact {
            description: "Publish profile",
            ..
        }
    ));

    let profiles = fx.project_directory.join("Profiles");
    std::fs::create_dir_all(&profiles).unwrap();
    std::fs::write(profiles.join("Prod.publish.xml"), "").unwrap();
    let paths = PathResolver::new(&LocalFileSystem)
        .resolve(&fx.project, &configuration, &resolved(None), CreationMode::Versioned)
        .await
        .unwrap();
    assert_eq!(
        paths.sources.publish_profile_path,
        fx.project_directory.join("Profiles/Prod.publish.xml")
    );
}
