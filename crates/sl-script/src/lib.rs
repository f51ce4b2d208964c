//! sl-script - Script modifier pipeline for SSDT Lifecycle
//!
//! This crate turns the raw deployment script produced by the build into
//! the final script: custom header and footer, handling of unnamed default
//! constraint drops, DACPAC version tracking and SQLCMD statement removal.

pub mod context;
pub mod error;
pub mod modifiers;
pub mod pipeline;

pub use context::{ModifierContext, LINE_BREAK};
pub use error::{ScriptError, ScriptResult};
pub use modifiers::ScriptModifier;
pub use pipeline::ModifierPipeline;
