//! `siteprep provision` — run the provisioning plan against a remote host.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::application::services::provision::provision;
use crate::commands::input::{self, ProjectArgs};
use crate::domain::Credentials;
use crate::infra::assets::EmbeddedAssets;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::LocalFs;
use crate::infra::ssh::SshConnector;
use crate::output::human::HumanRenderer;
use crate::output::json;
use crate::output::reporter::TerminalReporter;

/// Arguments for the provision command.
#[derive(Args, Debug, Default)]
pub struct ProvisionArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Private key to log in with instead of a password
    #[arg(short = 'i', long, value_name = "KEY")]
    pub identity: Option<PathBuf>,
}

/// Run the provision command.
///
/// # Errors
///
/// Returns an error if input resolution fails. A failed run is reported and
/// turned into a failure exit code, not an error.
pub async fn run(app: &AppContext, args: &ProvisionArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let project = input::resolve_project(app, &args.project, config.defaults.port)?;
    let plan = input::plan_for(&config, &project, &args.project)?;
    let secret = input::resolve_secret(app, args.identity.as_deref())?;

    let renderer = HumanRenderer::new(&app.output);
    renderer.render_project(&project);
    if !app.confirm(
        &format!("Provision {} on {} ({} steps)?", project.name, project.host, plan.len()),
        true,
    )? {
        app.output.info("Nothing changed.");
        return Ok(ExitCode::SUCCESS);
    }

    let credentials = Credentials::for_project(&project, secret);
    let connector = SshConnector::new(config.ssh.host_keys);
    let reporter = TerminalReporter::new(&app.output);

    let report = provision(
        &connector,
        &LocalFs,
        &TokioCommandRunner,
        &EmbeddedAssets,
        &reporter,
        &credentials,
        &plan,
    )
    .await;
    reporter.finish(report.is_completed());

    if app.is_json() {
        app.output.json(&json::format_report(&project, &report)?);
    } else {
        renderer.render_report(&report);
    }

    Ok(if report.is_completed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
