use super::*;
use crate::test_support;

const SCRIPT: &str = "PRINT N'Altering Table [dbo].[Author]...';\r\n\r\n\r\nGO\r\n\
PRINT N'Dropping unnamed constraint on [dbo].[Author]...';\r\n\r\n\r\nGO\r\n\
ALTER TABLE [dbo].[Author] DROP CONSTRAINT ;\r\n\r\n\r\nGO\r\n\
PRINT N'Update complete.';\r\n";

fn run(modifier: fn(&str, &ModifierContext<'_>) -> ScriptResult<String>, input: &str) -> String {
    let project = test_support::project();
    let paths = test_support::paths();
    let configuration = test_support::configuration();
    let ctx = ModifierContext::new(&project, &configuration, &paths);
    modifier(input, &ctx).unwrap()
}

#[test]
fn test_finds_block_across_separators() {
    let lines: Vec<&str> = SCRIPT.split_inclusive('\n').collect();
    let blocks = find_drop_blocks(&lines);
    assert_eq!(
        blocks,
        vec![DropBlock {
            print_line: 4,
            alter_line: 8,
            table: "[dbo].[Author]".to_string(),
            column: None,
        }]
    );
}

#[test]
fn test_ignores_print_without_matching_alter() {
    let script = "PRINT N'Dropping unnamed constraint on [dbo].[Author]...';\r\nGO\r\n\
ALTER TABLE [dbo].[Book] DROP CONSTRAINT ;\r\n";
    let lines: Vec<&str> = script.split_inclusive('\n').collect();
    assert!(find_drop_blocks(&lines).is_empty());
    assert_eq!(run(comment_out, script), script);
    assert_eq!(run(replace, script), script);
}

#[test]
fn test_comment_out_prefixes_block_lines() {
    let output = run(comment_out, SCRIPT);
    let expected = "PRINT N'Altering Table [dbo].[Author]...';\r\n\r\n\r\nGO\r\n\
-- PRINT N'Dropping unnamed constraint on [dbo].[Author]...';\r\n-- \r\n-- \r\n-- GO\r\n\
-- ALTER TABLE [dbo].[Author] DROP CONSTRAINT ;\r\n\r\n\r\nGO\r\n\
PRINT N'Update complete.';\r\n";
    assert_eq!(output, expected);
}

#[test]
fn test_comment_out_handles_several_blocks() {
    let script = format!(
        "{}{}",
        "PRINT N'Dropping unnamed constraint on [dbo].[A]...';\nGO\nALTER TABLE [dbo].[A] DROP CONSTRAINT ;\nGO\n",
        "PRINT N'Dropping unnamed constraint on [dbo].[B]...';\nGO\nALTER TABLE [dbo].[B] DROP CONSTRAINT ;\nGO\n"
    );
    let output = run(comment_out, &script);
    assert_eq!(output.matches("-- ALTER TABLE").count(), 2);
    assert_eq!(output.matches("\nGO\n").count(), 2);
}

#[test]
fn test_replace_uses_system_named_constraint_lookup() {
    let output = run(replace, SCRIPT);
    assert!(!output.contains("DROP CONSTRAINT ;"));
    assert!(output.contains("PRINT N'Dropping unnamed constraint on [dbo].[Author]...';"));
    assert!(output.contains("FROM [sys].[default_constraints] AS [dc]"));
    assert!(output.contains("WHERE [dc].[parent_object_id] = OBJECT_ID(N'[dbo].[Author]')"));
    assert!(output.contains("AND [dc].[is_system_named] = 1"));
    assert!(output.contains("AND [other].[is_system_named] = 1) = 1"));
    assert!(output.contains("EXEC [sys].[sp_executesql] @UnnamedConstraintDrop1;\r\n\r\n\r\nGO\r\n"));
    assert!(output.ends_with("PRINT N'Update complete.';\r\n"));
}

#[test]
fn test_replace_escapes_quotes_in_table_name() {
    let script = "PRINT N'Dropping unnamed constraint on [dbo].[O''Brien]...';\nGO\n\
ALTER TABLE [dbo].[O'Brien] DROP CONSTRAINT ;\n";
    let output = run(replace, script);
    assert!(output.contains("OBJECT_ID(N'[dbo].[O''Brien]')"));
    assert!(output.contains("N'ALTER TABLE [dbo].[O''Brien] DROP CONSTRAINT '"));
}

const TWO_DEFAULTS: &str = "PRINT N'Dropping unnamed constraint on [dbo].[Author]...';\r\nGO\r\n\
ALTER TABLE [dbo].[Author] DROP CONSTRAINT ;\r\nGO\r\n\
PRINT N'Dropping unnamed constraint on [dbo].[Author]...';\r\nGO\r\n\
ALTER TABLE [dbo].[Author] DROP CONSTRAINT ;\r\nGO\r\n\
ALTER TABLE [dbo].[Author] ALTER COLUMN [Active] INT NOT NULL;\r\nGO\r\n\
ALTER TABLE [dbo].[Author] ADD DEFAULT 1 FOR [Active];\r\nGO\r\n\
ALTER TABLE [dbo].[Author]\r\n    ADD DEFAULT (N'') FOR [Pen]]Name];\r\nGO\r\n";

#[test]
fn test_blocks_claim_recreated_columns_in_order() {
    let lines: Vec<&str> = TWO_DEFAULTS.split_inclusive('\n').collect();
    let columns: Vec<Option<String>> = find_drop_blocks(&lines)
        .into_iter()
        .map(|block| block.column)
        .collect();
    assert_eq!(
        columns,
        vec![Some("Active".to_string()), Some("Pen]Name".to_string())]
    );
}

#[test]
fn test_replace_restricts_lookup_to_column() {
    let output = run(replace, TWO_DEFAULTS);
    assert!(output.contains(
        "AND [dc].[parent_column_id] = COLUMNPROPERTY(OBJECT_ID(N'[dbo].[Author]'), N'Active', 'ColumnId')"
    ));
    assert!(output.contains(
        "AND [dc].[parent_column_id] = COLUMNPROPERTY(OBJECT_ID(N'[dbo].[Author]'), N'Pen]Name', 'ColumnId')"
    ));
    assert!(!output.contains("[other]"));
    assert!(output.contains("ALTER TABLE [dbo].[Author] ADD DEFAULT 1 FOR [Active];"));
}

#[test]
fn test_replacements_in_one_batch_use_distinct_variables() {
    let script = "PRINT N'Dropping unnamed constraint on [dbo].[A]...';\n\
ALTER TABLE [dbo].[A] DROP CONSTRAINT ;\n\
PRINT N'Dropping unnamed constraint on [dbo].[B]...';\n\
ALTER TABLE [dbo].[B] DROP CONSTRAINT ;\n";
    let output = run(replace, script);
    assert_eq!(output.matches("DECLARE @UnnamedConstraintDrop1 ").count(), 1);
    assert_eq!(output.matches("DECLARE @UnnamedConstraintDrop2 ").count(), 1);
    assert!(output.contains("EXEC [sys].[sp_executesql] @UnnamedConstraintDrop2;\n"));
}

#[test]
fn test_named_default_is_not_a_recreation() {
    let script = "PRINT N'Dropping unnamed constraint on [dbo].[A]...';\nGO\n\
ALTER TABLE [dbo].[A] DROP CONSTRAINT ;\nGO\n\
ALTER TABLE [dbo].[A] ADD CONSTRAINT [DF_A_Flag] DEFAULT 0 FOR [Flag];\n";
    let lines: Vec<&str> = script.split_inclusive('\n').collect();
    assert_eq!(find_drop_blocks(&lines)[0].column, None);
}
