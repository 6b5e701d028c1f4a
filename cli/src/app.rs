//! Application context passed to every command handler.

use anyhow::Result;

use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalFs;
use crate::output::{OutputContext, OutputMode};

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub no_color: bool,
    pub quiet: bool,
    pub json: bool,
    /// Skip interactive prompts (also set by `CI` / `SITEPREP_YES` env vars).
    pub yes: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    pub output: OutputContext,
    pub config_store: YamlConfigStore,
    /// When `true`, never prompt: missing input is an error and
    /// confirmations take their default.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("SITEPREP_YES").is_ok();
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(mode, flags.no_color, flags.quiet),
            config_store: YamlConfigStore::locate(&LocalFs),
            non_interactive: flags.yes || ci_env,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.output.is_json()
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `SITEPREP_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
