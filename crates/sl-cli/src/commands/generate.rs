//! Generate command implementation

use anyhow::{Context, Result};
use sl_core::{CreationMode, SqlProject};
use sl_deploy::{
    ConfigurationService, CreationState, GenerationRequest, LocalFileSystem, LogErrorSink,
    ScriptCreationService,
};
use sl_script::ModifierPipeline;
use std::sync::Arc;

use crate::cli::{GenerateArgs, GlobalArgs};
use crate::commands::common::{load_project, print_errors, ExitCode, DEFAULT_BINARY_DIRECTORY};

/// Execute the generate command
pub async fn execute(args: &GenerateArgs, global: &GlobalArgs) -> Result<()> {
    let mut project = load_project(global)?;
    apply_build_properties(&mut project, args)?;

    let fs = Arc::new(LocalFileSystem);
    let configuration = ConfigurationService::new(fs.clone())
        .load_or_default(&project)
        .await?;
    if configuration.has_errors() {
        eprintln!("Configuration for {} is invalid:", project.name);
        print_errors(&configuration.error_messages());
        return Err(ExitCode(1).into());
    }

    if global.verbose {
        let stages = ModifierPipeline::from_configuration(&configuration)?.stages();
        if stages.is_empty() {
            println!("No script modifiers configured");
        }
        for (i, stage) in stages.iter().enumerate() {
            println!("  {}. {stage}", i + 1);
        }
    }

    let raw_script = tokio::fs::read_to_string(&args.script)
        .await
        .with_context(|| format!("Failed to read {}", args.script.display()))?;

    let mode = if args.latest {
        CreationMode::Latest
    } else {
        CreationMode::Versioned
    };
    let request = GenerationRequest {
        project: &project,
        configuration: &configuration,
        previous_version: args.previous.as_ref(),
        raw_script: &raw_script,
        mode,
    };
    let service = ScriptCreationService::new(fs, Arc::new(LogErrorSink), CreationState::new());

    if args.dry_run {
        let generated = service.generate(request).await?;
        println!("{}", generated.script);
        eprintln!(
            "Dry run - would write {}",
            generated.paths.targets.deploy_script_path.display()
        );
        return Ok(());
    }

    let (generated, persisted) = service.create(request).await?;
    println!(
        "Created {mode} script for {} version {}",
        project.name, generated.version.formatted
    );
    println!("  Script: {}", persisted.script_path.display());
    for copied in &persisted.copied {
        println!("  Copied: {}", copied.display());
    }
    for deleted in &persisted.deleted {
        println!("  Deleted: {}", deleted.display());
    }
    Ok(())
}

/// Fill in the properties the build would normally provide
pub(crate) fn apply_build_properties(project: &mut SqlProject, args: &GenerateArgs) -> Result<()> {
    let directory = project.directory()?.to_path_buf();
    let target_name = args.target_name.clone().unwrap_or_else(|| project.name.clone());
    let binary_directory = match &args.binary_dir {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => directory.join(dir),
        None => directory.join(DEFAULT_BINARY_DIRECTORY),
    };

    project.properties.sql_target_name = Some(target_name);
    project.properties.binary_directory = Some(binary_directory);
    project.properties.dac_version = Some(args.dac_version);
    Ok(())
}
