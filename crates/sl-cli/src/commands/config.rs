//! Config command implementation

use anyhow::{Context, Result};
use sl_core::{ConfigurationField, ConfigurationModel, DirtyTracker};
use sl_deploy::{ConfigurationService, LocalFileSystem};
use std::sync::Arc;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalArgs};
use crate::commands::common::{load_project, print_errors, ExitCode};

/// Execute the config command
pub async fn execute(args: &ConfigArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let service = ConfigurationService::new(Arc::new(LocalFileSystem));

    match &args.command {
        ConfigCommand::Show => {
            let configuration = service.load_or_default(&project).await?;
            let json = serde_json::to_string_pretty(configuration.settings())
                .context("Failed to serialize configuration")?;
            println!("{json}");
            if configuration.has_errors() {
                eprintln!("Validation errors:");
                print_errors(&configuration.error_messages());
            }
            Ok(())
        }
        ConfigCommand::Validate => {
            let configuration = service.load_or_default(&project).await?;
            if configuration.has_errors() {
                eprintln!("Configuration for {} is invalid:", project.name);
                print_errors(&configuration.error_messages());
                return Err(ExitCode(1).into());
            }
            println!("Configuration for {} is valid", project.name);
            Ok(())
        }
        ConfigCommand::Set { field, value } => {
            let mut configuration = service.load_or_default(&project).await?;
            let field: ConfigurationField = field.parse()?;
            let changed = apply_change(&mut configuration, field, value)?;
            if !changed {
                println!("{field} is already {value:?}, nothing to save");
                return Ok(());
            }
            if configuration.has_errors() {
                eprintln!("Not saved, the configuration would be invalid:");
                print_errors(&configuration.error_messages());
                return Err(ExitCode(1).into());
            }
            let path = service.save(&project, &configuration).await?;
            println!("Set {field} and saved {}", path.display());
            Ok(())
        }
        ConfigCommand::Reset => {
            let path = service
                .save(&project, &ConfigurationModel::default())
                .await?;
            println!("Saved default configuration to {}", path.display());
            Ok(())
        }
    }
}

/// Apply one textual edit, returning whether the configuration changed
pub(crate) fn apply_change(
    configuration: &mut ConfigurationModel,
    field: ConfigurationField,
    value: &str,
) -> Result<bool> {
    let tracker = Arc::new(DirtyTracker::new());
    let subscription = configuration.subscribe(tracker.clone());
    tracker.mark_saved(configuration);

    let result = configuration.set_field(field, value);
    configuration.unsubscribe(subscription);
    result?;
    Ok(tracker.is_dirty())
}
