//! Removal of SQLCMD-only statements from the final script.
//!
//! `GO` batch separators are plain T-SQL tooling syntax and are kept.

use crate::context::ModifierContext;
use crate::error::ScriptResult;
use regex::Regex;
use std::sync::OnceLock;

static DETECTION_COMMENT_RE: OnceLock<Regex> = OnceLock::new();
static DETECTION_CHECK_RE: OnceLock<Regex> = OnceLock::new();
static USE_VARIABLE_RE: OnceLock<Regex> = OnceLock::new();

fn detection_comment_re() -> &'static Regex {
    DETECTION_COMMENT_RE.get_or_init(|| {
        Regex::new(r"(?s)/\*\s*Detect SQLCMD mode.*?\*/[ \t]*\r?\n?").expect("valid regex")
    })
}

fn detection_check_re() -> &'static Regex {
    DETECTION_CHECK_RE.get_or_init(|| {
        Regex::new(
            r"(?s)IF N'\$\(__IsSqlCmdEnabled\)' NOT LIKE N'True'\s*BEGIN.*?\bEND\b[ \t]*\r?\n?",
        )
        .expect("valid regex")
    })
}

fn use_variable_re() -> &'static Regex {
    USE_VARIABLE_RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*USE\s+\[\$\([^)]*\)\]\s*;?\s*$").expect("valid regex")
    })
}

pub(crate) fn remove_sql_cmd_statements(
    input: &str,
    ctx: &ModifierContext<'_>,
) -> ScriptResult<String> {
    ctx.require_project_name()?;

    let without_comment = detection_comment_re().replace_all(input, "");
    let without_check = detection_check_re().replace_all(&without_comment, "");

    let mut removed = 0usize;
    let output: String = without_check
        .split_inclusive('\n')
        .filter(|line| {
            let content = line.trim_end_matches(['\r', '\n']);
            let keep = !(content.trim_start().starts_with(':')
                || use_variable_re().is_match(content));
            if !keep {
                removed += 1;
            }
            keep
        })
        .collect();

    log::debug!("Removed {removed} SQLCMD statement line(s)");
    Ok(output)
}

#[cfg(test)]
#[path = "sqlcmd_test.rs"]
mod tests;
