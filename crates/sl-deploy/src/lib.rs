//! sl-deploy - Script creation orchestration for SSDT Lifecycle
//!
//! This crate connects the configuration model and the modifier pipeline to
//! the file system: it resolves the paths of a run, loads and saves project
//! configuration, produces the final deployment script, and persists it
//! along with its DACPAC.

pub mod configuration;
pub mod creation;
pub mod error;
pub mod error_sink;
pub mod fs;
pub mod path_resolver;
pub mod state;

pub use configuration::{configuration_path, ConfigurationService};
pub use creation::{GeneratedScript, GenerationRequest, PersistedArtifacts, ScriptCreationService};
pub use error::{DeployError, DeployResult};
pub use error_sink::{ErrorSink, LogErrorSink, SinkError};
pub use fs::{FileSystemAccess, LocalFileSystem};
pub use path_resolver::PathResolver;
pub use state::CreationState;
