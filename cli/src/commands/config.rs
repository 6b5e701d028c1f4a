//! `siteprep config` — show and set configuration values.

use anyhow::Result;
use std::process::ExitCode;

use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Print the configuration file location
    Path,
    /// Set configuration value
    Set {
        /// Configuration key (defaults.port, local.sites_dir, ssh.host_keys)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the key or value is invalid or the config file
/// cannot be read or written.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Path => show_path(app),
        ConfigCommand::Set { key, value } => set_config(app, &key, &value),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let path = app.config_store.path()?;
    if app.is_json() {
        app.output.json(&serde_json::to_string_pretty(&config)?);
    } else {
        crate::output::human::HumanRenderer::new(&app.output)
            .render_config(&config, &path.display().to_string());
    }
    Ok(ExitCode::SUCCESS)
}

fn show_path(app: &AppContext) -> Result<ExitCode> {
    let path = app.config_store.path()?;
    if app.is_json() {
        app.output
            .json(&serde_json::json!({ "path": path.display().to_string() }).to_string());
    } else {
        app.output.plain(&path.display().to_string());
    }
    Ok(ExitCode::SUCCESS)
}

fn set_config(app: &AppContext, key: &str, value: &str) -> Result<ExitCode> {
    config_service::set_value(&app.config_store, key, value)?;
    if app.is_json() {
        app.output
            .json(&serde_json::json!({ "key": key, "value": value }).to_string());
    } else {
        app.output.success(&format!("Set {key} = {value}"));
    }
    Ok(ExitCode::SUCCESS)
}
