//! Custom header and footer

use crate::context::{ModifierContext, LINE_BREAK};
use crate::error::ScriptResult;

/// Prepend the configured header followed by a line break
pub(crate) fn add_header(input: &str, ctx: &ModifierContext<'_>) -> ScriptResult<String> {
    ctx.require_project_name()?;
    Ok(match non_blank(ctx.configuration.custom_header()) {
        Some(header) => format!("{header}{LINE_BREAK}{input}"),
        None => input.to_string(),
    })
}

/// Append a line break followed by the configured footer
pub(crate) fn add_footer(input: &str, ctx: &ModifierContext<'_>) -> ScriptResult<String> {
    ctx.require_project_name()?;
    Ok(match non_blank(ctx.configuration.custom_footer()) {
        Some(footer) => format!("{input}{LINE_BREAK}{footer}"),
        None => input.to_string(),
    })
}

pub(crate) fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
