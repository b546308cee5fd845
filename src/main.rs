//! fileset-config - command line access to a project's file set configuration.
//!
//! # Commands
//!
//! - `show`: print file sets, customised filters and local check configurations
//! - `normalize`: load the project file and store it again in canonical form
//! - `set-simple <true|false>`: switch the simple file set editor flag
//!
//! Settings are read from `fileset-config.yaml` in the working directory
//! (see [`SettingsManager`]); log files go to the configured log directory.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use fileset_config::persistence::read_project_configuration;
use fileset_config::{
    APP_NAME, FsProject, ProjectConfigurationView, ProjectConfigurationWorkingCopy,
    SettingsManager, VERSION,
};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "fileset-config", version, about)]
struct Cli {
    /// Project root directory
    project: Utf8PathBuf,

    /// Settings file
    #[arg(long, default_value = "fileset-config.yaml")]
    settings: Utf8PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of the configuration
    Show,
    /// Rewrite the configuration file in canonical form
    Normalize,
    /// Switch the simple file set editor on or off
    SetSimple {
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = SettingsManager::new(&cli.settings).load_settings()?;
    let debug_mode = cli.debug || settings.debug_mode;
    let _guard =
        fileset_config::logging::setup_logging(&settings.log_dir, APP_NAME, debug_mode, true)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let registry = Arc::new(settings.filter_registry()?);
    let global_configs = settings.global_configs();
    let project = Arc::new(FsProject::new(&cli.project));

    let baseline = read_project_configuration(project, &registry, &global_configs)
        .with_context(|| format!("Failed to load configuration of {}", cli.project))?;
    let mut working_copy =
        ProjectConfigurationWorkingCopy::new(Arc::new(baseline), registry, &global_configs);

    match cli.command {
        Command::Show => print_summary(&working_copy),
        Command::Normalize => {
            working_copy.store()?;
            println!("Rewrote configuration of {}", working_copy.project_name());
        }
        Command::SetSimple { value } => {
            working_copy.set_use_simple_config(value);
            if working_copy.is_dirty() {
                working_copy.store()?;
                println!("simple-config set to {}", value);
            } else {
                println!("simple-config already {}", value);
            }
        }
    }

    Ok(())
}

fn print_summary(config: &ProjectConfigurationWorkingCopy) {
    println!("Project: {}", config.project_name());
    println!("Simple config: {}", config.use_simple_config());

    for check_config in config.local_check_configurations() {
        println!(
            "Local check config: {} ({}, {})",
            check_config.name,
            check_config.config_type.internal_name(),
            check_config.location
        );
    }

    for file_set in config.file_sets() {
        let check_config = file_set
            .check_config
            .as_ref()
            .map_or("<none>", |c| c.config().name.as_str());
        println!(
            "File set: {} [{}] -> {} ({} patterns)",
            file_set.name,
            if file_set.enabled { "enabled" } else { "disabled" },
            check_config,
            file_set.file_match_patterns.len()
        );
    }

    for filter in config
        .filters()
        .iter()
        .filter(|f| !config.registry().is_default(f))
    {
        println!(
            "Filter: {} enabled={} data={:?}",
            filter.internal_name, filter.enabled, filter.filter_data
        );
    }
}
