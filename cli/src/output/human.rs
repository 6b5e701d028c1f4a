//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::{Plan, Project, ProvisionReport, SiteprepConfig, StepOutcome};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version.
    pub fn render_version(&self, version: &str) {
        self.ctx.plain(&format!("siteprep {version}"));
    }

    /// Render the project a plan or run applies to.
    pub fn render_project(&self, project: &Project) {
        self.ctx.kv("Project:", &project.name);
        self.ctx.kv("Host:   ", &format!("{}@{}:{}", project.user, project.host, project.port));
        self.ctx.kv("Type:   ", project.kind.label());
    }

    /// Render every step of `plan`, numbered from 1.
    pub fn render_plan(&self, plan: &Plan) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header(&format!("Plan ({} steps):", plan.len()));
        for (index, step) in plan.steps().iter().enumerate() {
            let side = if step.is_remote() { "remote" } else { "local " };
            println!(
                "  {:>2}. {} {step}",
                index + 1,
                side.style(self.ctx.styles.kind)
            );
        }
    }

    /// Render the closing summary of a provisioning run.
    pub fn render_report(&self, report: &ProvisionReport) {
        let ignored = report
            .records
            .iter()
            .filter(|r| matches!(r.outcome, StepOutcome::IgnoredFailure(_)))
            .count();

        if let Some(err) = &report.failure {
            self.ctx.error(&err.to_string());
            self.ctx.error(&format!(
                "Provisioning aborted after {} of its steps.",
                report.records.len()
            ));
            return;
        }

        if !self.ctx.quiet {
            println!();
        }
        if ignored == 0 {
            self.ctx
                .success(&format!("Provisioning completed ({} steps).", report.records.len()));
        } else {
            self.ctx.success(&format!(
                "Provisioning completed ({} steps, {ignored} tolerated failures).",
                report.records.len()
            ));
        }
    }

    /// Render the effective configuration.
    pub fn render_config(&self, config: &SiteprepConfig, path: &str) {
        self.ctx.header("Configuration");
        self.ctx.kv("File:             ", path);
        self.ctx
            .kv("defaults.port:    ", &config.defaults.port.to_string());
        let sites_dir = config
            .local
            .sites_dir
            .as_ref()
            .map_or_else(|| "~/sites (default)".to_string(), |p| p.display().to_string());
        self.ctx.kv("local.sites_dir:  ", &sites_dir);
        self.ctx.kv("ssh.host_keys:    ", config.ssh.host_keys.as_str());
    }
}
