//! Application code generator.
//!
//! This binary reads the schema of an existing database and writes the
//! models, controllers and router of a Go/beego application.
//!
//! # Guarantees
//! - Read-only database operations only
//! - Credentials are never logged
//! - Existing files are only replaced as the overwrite policy allows

mod cli;
mod config;
mod prompt;
mod workspace;

use anyhow::{Context, Result};
use clap::Parser;
use dbscaffold_core::{
    emit::OverwritePolicy,
    error::redact_database_url,
    generate::{self, GenerateOptions, GenerateRequest},
    logging::init_logging,
};
use tracing::{error, info};

use crate::cli::{Cli, Command, GenerateArgs};
use crate::config::{FileConfig, Settings};
use crate::prompt::StdinPrompt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    let working_dir = std::env::current_dir().context("Failed to determine working directory")?;
    let file_config = FileConfig::load(cli.global.config.as_deref(), &working_dir)?;

    match &cli.command {
        Command::Generate(args) => generate_appcode(args, &file_config).await,
    }
}

/// Resolves settings and runs one generation
async fn generate_appcode(args: &GenerateArgs, file_config: &FileConfig) -> Result<()> {
    let settings = Settings::resolve(args, file_config)?;

    info!("Using '{}' as driver", settings.driver);
    info!("Using '{}' as conn", redact_database_url(&settings.conn));
    info!("Using '{}' as tables", settings.tables);
    info!("Using '{}' as mode", settings.mode);

    // Validate before touching the filesystem
    let request = GenerateRequest::parse(
        &settings.driver,
        &settings.conn,
        &settings.mode,
        &settings.tables,
        &settings.output,
    )?;

    tokio::fs::create_dir_all(&settings.output)
        .await
        .with_context(|| format!("Failed to create {}", settings.output.display()))?;

    let package_path = match settings.package {
        Some(package) => package,
        None => workspace::resolve_package_path(
            &settings.output,
            std::env::var_os("GOPATH").as_deref(),
        )?,
    };
    info!("Using '{}' as package path", package_path);

    let options = GenerateOptions {
        package_path,
        overwrite: settings.overwrite,
        prompt: (settings.overwrite == OverwritePolicy::Prompt)
            .then(|| Box::new(StdinPrompt) as Box<dyn dbscaffold_core::OverwritePrompt>),
        formatter: settings.formatter,
    };

    let summary = generate::run(request, options).await.map_err(|e| {
        error!("Generation failed: {}", e);
        e
    })?;

    println!("Application code generated in {}", settings.output.display());
    println!("Tables: {}", summary.tables.len());
    if !summary.blacklisted.is_empty() {
        println!("Without primary key: {}", summary.blacklisted.join(", "));
    }
    println!(
        "Files: {} written, {} skipped, {} failed",
        summary.files.written, summary.files.skipped, summary.files.failed
    );

    Ok(())
}
