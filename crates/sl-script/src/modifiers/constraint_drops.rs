//! Handling of unnamed default constraint drops.
//!
//! When a default constraint has a system-generated name the build tool
//! cannot name it in the drop statement and emits an invalid
//! `ALTER TABLE <table> DROP CONSTRAINT ;` preceded by a
//! `PRINT N'Dropping unnamed constraint on <table>...';` line. Blank lines
//! and `GO` separators may sit between the two.
//!
//! The column a drop belongs to is taken from the `ALTER TABLE <table> ADD
//! DEFAULT ... FOR <column>;` statement that recreates the default later in
//! the script. Drops on the same table claim those statements in order.

use crate::context::{ModifierContext, LINE_BREAK};
use crate::error::ScriptResult;
use regex::Regex;
use std::sync::OnceLock;

const COMMENT_PREFIX: &str = "-- ";

static PRINT_RE: OnceLock<Regex> = OnceLock::new();
static ALTER_RE: OnceLock<Regex> = OnceLock::new();
static ADD_DEFAULT_RE: OnceLock<Regex> = OnceLock::new();

fn print_re() -> &'static Regex {
    PRINT_RE.get_or_init(|| {
        Regex::new(r"^\s*PRINT N'Dropping unnamed constraint on (?P<table>.+)\.\.\.';\s*$")
            .expect("valid regex")
    })
}

fn alter_re() -> &'static Regex {
    ALTER_RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*ALTER TABLE (?P<table>.+?) DROP CONSTRAINT\s*;\s*$")
            .expect("valid regex")
    })
}

fn add_default_re() -> &'static Regex {
    ADD_DEFAULT_RE.get_or_init(|| {
        Regex::new(
            r"(?im)^[ \t]*ALTER TABLE (?P<table>[^;\r\n]+?)\s+ADD\s+DEFAULT\b[^;]*?\bFOR\s+(?P<column>\[(?:[^\]]|\]\])+\]|\w+)\s*;",
        )
        .expect("valid regex")
    })
}

/// One recognised drop, as line indices into the script
#[derive(Debug, PartialEq, Eq)]
struct DropBlock {
    print_line: usize,
    alter_line: usize,
    table: String,
    /// Unquoted column name, when a later statement recreates its default
    column: Option<String>,
}

/// An `ADD DEFAULT ... FOR <column>` statement without a constraint name
#[derive(Debug)]
struct DefaultRecreation {
    line: usize,
    table: String,
    column: String,
    claimed: bool,
}

/// Prefix every line of each unnamed drop block with `-- `
pub(crate) fn comment_out(input: &str, ctx: &ModifierContext<'_>) -> ScriptResult<String> {
    ctx.require_project_name()?;
    let lines: Vec<&str> = input.split_inclusive('\n').collect();
    let blocks = find_drop_blocks(&lines);
    if blocks.is_empty() {
        return Ok(input.to_string());
    }

    let mut output = String::with_capacity(input.len() + blocks.len() * 16);
    let mut blocks_iter = blocks.iter().peekable();
    for (index, line) in lines.iter().enumerate() {
        while blocks_iter
            .peek()
            .is_some_and(|block| block.alter_line < index)
        {
            blocks_iter.next();
        }
        let in_block = blocks_iter
            .peek()
            .is_some_and(|block| block.print_line <= index);
        if in_block {
            output.push_str(COMMENT_PREFIX);
        }
        output.push_str(line);
    }
    log::debug!("Commented out {} unnamed default constraint drop(s)", blocks.len());
    Ok(output)
}

/// Replace each invalid drop statement with a lookup of the system-named
/// default constraint on the same table and column
pub(crate) fn replace(input: &str, ctx: &ModifierContext<'_>) -> ScriptResult<String> {
    ctx.require_project_name()?;
    let lines: Vec<&str> = input.split_inclusive('\n').collect();
    let blocks = find_drop_blocks(&lines);
    if blocks.is_empty() {
        return Ok(input.to_string());
    }

    let mut output = String::with_capacity(input.len() + blocks.len() * 512);
    let mut next_block = 0;
    for (index, line) in lines.iter().enumerate() {
        match blocks.get(next_block) {
            Some(block) if block.alter_line == index => {
                next_block += 1;
                if block.column.is_none() {
                    log::warn!(
                        "No default is recreated after the unnamed drop on {}; \
                         the drop only runs when the table has a single system-named default",
                        block.table
                    );
                }
                output.push_str(&drop_statement(block, next_block));
                output.push_str(line_ending(line));
            }
            _ => output.push_str(line),
        }
    }
    log::debug!("Replaced {} unnamed default constraint drop(s)", blocks.len());
    Ok(output)
}

fn find_drop_blocks(lines: &[&str]) -> Vec<DropBlock> {
    let mut blocks = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        let Some(print) = print_re().captures(content(lines[index])) else {
            index += 1;
            continue;
        };
        // the PRINT text is a string literal, so quotes arrive doubled
        let table = print["table"].trim().replace("''", "'");

        let mut candidate = index + 1;
        while candidate < lines.len() && is_separator(content(lines[candidate])) {
            candidate += 1;
        }
        let matched = lines.get(candidate).is_some_and(|line| {
            alter_re()
                .captures(content(line))
                .is_some_and(|alter| alter["table"].trim() == table)
        });

        if matched {
            blocks.push(DropBlock {
                print_line: index,
                alter_line: candidate,
                table,
                column: None,
            });
            index = candidate + 1;
        } else {
            index += 1;
        }
    }

    let mut recreations = find_default_recreations(lines);
    for block in &mut blocks {
        let recreation = recreations
            .iter_mut()
            .find(|r| !r.claimed && r.line > block.alter_line && r.table == block.table);
        if let Some(recreation) = recreation {
            recreation.claimed = true;
            block.column = Some(recreation.column.clone());
        }
    }
    blocks
}

fn find_default_recreations(lines: &[&str]) -> Vec<DefaultRecreation> {
    // the build splits these statements over two lines
    let text = lines.concat();
    add_default_re()
        .captures_iter(&text)
        .filter_map(|captures| {
            let start = captures.get(0)?.start();
            Some(DefaultRecreation {
                line: text[..start].matches('\n').count(),
                table: captures["table"].trim().to_string(),
                column: unquote_identifier(&captures["column"]),
                claimed: false,
            })
        })
        .collect()
}

fn unquote_identifier(identifier: &str) -> String {
    match identifier
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(inner) => inner.replace("]]", "]"),
        None => identifier.to_string(),
    }
}

/// Dynamic drop of one system-named default. Each replacement declares its
/// own variable since several may share a batch.
fn drop_statement(block: &DropBlock, ordinal: usize) -> String {
    let table = block.table.replace('\'', "''");
    let variable = format!("@UnnamedConstraintDrop{ordinal}");
    let mut lines = vec![
        format!("DECLARE {variable} NVARCHAR(MAX) = ("),
        format!(
            "    SELECT TOP (1) N'ALTER TABLE {table} DROP CONSTRAINT ' + QUOTENAME([dc].[name]) + N';'"
        ),
        "      FROM [sys].[default_constraints] AS [dc]".to_string(),
        format!("     WHERE [dc].[parent_object_id] = OBJECT_ID(N'{table}')"),
        "       AND [dc].[is_system_named] = 1".to_string(),
    ];
    match &block.column {
        Some(column) => lines.push(format!(
            "       AND [dc].[parent_column_id] = COLUMNPROPERTY(OBJECT_ID(N'{table}'), N'{}', 'ColumnId')",
            column.replace('\'', "''")
        )),
        None => {
            lines.push("       AND (SELECT COUNT(*)".to_string());
            lines.push("              FROM [sys].[default_constraints] AS [other]".to_string());
            lines.push(format!(
                "             WHERE [other].[parent_object_id] = OBJECT_ID(N'{table}')"
            ));
            lines.push("               AND [other].[is_system_named] = 1) = 1".to_string());
        }
    }
    lines.push(");".to_string());
    lines.push(format!("IF {variable} IS NOT NULL"));
    lines.push(format!("    EXEC [sys].[sp_executesql] {variable};"));
    lines.join(LINE_BREAK)
}

fn content(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

fn line_ending(line: &str) -> &str {
    &line[content(line).len()..]
}

fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("GO")
}

#[cfg(test)]
#[path = "constraint_drops_test.rs"]
mod tests;
