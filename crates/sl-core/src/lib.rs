//! sl-core - Core library for SSDT Lifecycle
//!
//! This crate provides the validated configuration model, version ordering
//! and pattern rendering, SQL project identity, and the path collection used
//! by every script creation run.

pub mod config;
pub mod error;
pub mod paths;
pub mod project;
pub mod version;

pub use config::{
    ConfigurationField, ConfigurationModel, ConfigurationObserver, ConfigurationSettings,
    DirtyTracker, SubscriptionId, ValidationRule, DEFAULT_ARTIFACTS_PATH, SINGLE_PROFILE_KEYWORD,
};
pub use error::{CoreError, CoreResult};
pub use paths::{
    CreationMode, DeploySourcePaths, DeployTargetPaths, DirectoryPaths, PathCollection,
};
pub use project::{ProjectProperties, SqlProject};
pub use version::{ResolvedVersion, Version, VersionComponent, VersionPattern, VersionResolver};
