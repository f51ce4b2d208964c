//! Ordered modifier pipeline built from configuration flags.
//!
//! The pipeline runs in two phases: the content stages in their fixed order,
//! then SQLCMD removal when configured. Keeping the final stage separate
//! guarantees it sees the complete output of every other stage.

use crate::context::ModifierContext;
use crate::error::{ScriptError, ScriptResult};
use crate::modifiers::{non_blank, ScriptModifier};
use sl_core::ConfigurationModel;

/// Modifiers selected for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierPipeline {
    content: Vec<ScriptModifier>,
    finalizer: Option<ScriptModifier>,
}

impl ModifierPipeline {
    /// Select the modifiers enabled by `configuration`.
    ///
    /// A configuration with validation errors is refused, which also rules
    /// out both unnamed-constraint modifiers being selected together.
    pub fn from_configuration(configuration: &ConfigurationModel) -> ScriptResult<Self> {
        if configuration.has_errors() {
            return Err(ScriptError::InvalidConfiguration {
                errors: configuration.error_messages(),
            });
        }

        let mut content = Vec::new();
        if non_blank(configuration.custom_header()).is_some() {
            content.push(ScriptModifier::AddCustomHeader);
        }
        if non_blank(configuration.custom_footer()).is_some() {
            content.push(ScriptModifier::AddCustomFooter);
        }
        if configuration.comment_out_unnamed_default_constraint_drops() {
            content.push(ScriptModifier::CommentOutUnnamedDefaultConstraintDrops);
        } else if configuration.replace_unnamed_default_constraint_drops() {
            content.push(ScriptModifier::ReplaceUnnamedDefaultConstraintDrops);
        }
        if configuration.track_dacpac_version() {
            content.push(ScriptModifier::TrackDacpacVersion);
        }

        let finalizer = configuration
            .remove_sql_cmd_statements()
            .then_some(ScriptModifier::RemoveSqlCmdStatements);

        Ok(Self { content, finalizer })
    }

    /// Stages in execution order
    pub fn stages(&self) -> Vec<ScriptModifier> {
        self.content.iter().copied().chain(self.finalizer).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.finalizer.is_none()
    }

    /// Run every stage, each on the complete output of the previous one
    pub fn apply(&self, input: &str, ctx: &ModifierContext<'_>) -> ScriptResult<String> {
        let mut script = input.to_string();
        for modifier in self.content.iter().chain(self.finalizer.iter()) {
            log::debug!("Applying modifier: {modifier}");
            script = modifier.modify(&script, ctx)?;
        }
        Ok(script)
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
