//! `siteprep plan` — show the steps a provisioning run would execute.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::commands::input::{self, ProjectArgs};
use crate::output::human::HumanRenderer;
use crate::output::json;

/// Arguments for the plan command.
#[derive(Args, Debug, Default)]
pub struct PlanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Run the plan command. Never connects to the host.
///
/// # Errors
///
/// Returns an error if input resolution fails.
pub fn run(app: &AppContext, args: &PlanArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let project = input::resolve_project(app, &args.project, config.defaults.port)?;
    let plan = input::plan_for(&config, &project, &args.project)?;

    if app.is_json() {
        app.output.json(&json::format_plan(&project, &plan)?);
    } else {
        let renderer = HumanRenderer::new(&app.output);
        renderer.render_project(&project);
        renderer.render_plan(&plan);
    }
    Ok(ExitCode::SUCCESS)
}
