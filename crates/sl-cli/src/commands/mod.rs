//! CLI command implementations

pub(crate) mod common;
pub(crate) mod config;
pub(crate) mod generate;
