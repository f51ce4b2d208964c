//! The closed set of script modifiers

mod constraint_drops;
mod custom_text;
mod sqlcmd;
mod track_version;

pub(crate) use custom_text::non_blank;
pub use track_version::{render_tracking, ABSENT_COMPONENT, TRACKING_TABLE};

use crate::context::ModifierContext;
use crate::error::ScriptResult;
use std::fmt;

/// A single text transformation applied to the deployment script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptModifier {
    AddCustomHeader,
    AddCustomFooter,
    CommentOutUnnamedDefaultConstraintDrops,
    ReplaceUnnamedDefaultConstraintDrops,
    TrackDacpacVersion,
    /// Always runs after every other modifier
    RemoveSqlCmdStatements,
}

impl ScriptModifier {
    /// Produce the next script text from `input`.
    ///
    /// Fails with a missing-argument error before doing any work when the
    /// project lacks a value the modifier needs.
    pub fn modify(&self, input: &str, ctx: &ModifierContext<'_>) -> ScriptResult<String> {
        match self {
            ScriptModifier::AddCustomHeader => custom_text::add_header(input, ctx),
            ScriptModifier::AddCustomFooter => custom_text::add_footer(input, ctx),
            ScriptModifier::CommentOutUnnamedDefaultConstraintDrops => {
                constraint_drops::comment_out(input, ctx)
            }
            ScriptModifier::ReplaceUnnamedDefaultConstraintDrops => {
                constraint_drops::replace(input, ctx)
            }
            ScriptModifier::TrackDacpacVersion => track_version::track_dacpac_version(input, ctx),
            ScriptModifier::RemoveSqlCmdStatements => {
                sqlcmd::remove_sql_cmd_statements(input, ctx)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScriptModifier::AddCustomHeader => "add custom header",
            ScriptModifier::AddCustomFooter => "add custom footer",
            ScriptModifier::CommentOutUnnamedDefaultConstraintDrops => {
                "comment out unnamed default constraint drops"
            }
            ScriptModifier::ReplaceUnnamedDefaultConstraintDrops => {
                "replace unnamed default constraint drops"
            }
            ScriptModifier::TrackDacpacVersion => "track DACPAC version",
            ScriptModifier::RemoveSqlCmdStatements => "remove SQLCMD statements",
        }
    }
}

impl fmt::Display for ScriptModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "modifiers_test.rs"]
mod tests;
