//! Presentation for siteprep commands.
//!
//! A command either talks to the terminal with styled lines, or prints a
//! single JSON document on stdout. `OutputContext` owns that choice so
//! commands never print human lines into a JSON stream.

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use styles::Styles;

/// How a command presents its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Styled terminal lines (default).
    Human,
    /// One JSON document per command.
    Json,
}

/// Output context carrying the mode, styling and terminal state.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Human lines are suppressed: `--quiet` was given, or the mode is JSON.
    pub quiet: bool,
    pub mode: OutputMode,
}

impl OutputContext {
    /// Colors are only used for human output on a terminal.
    #[must_use]
    pub fn new(mode: OutputMode, no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if mode == OutputMode::Human && is_tty && !no_color {
            styles.colorize();
        }
        Self {
            styles,
            is_tty,
            quiet: quiet || mode == OutputMode::Json,
            mode,
        }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Spinners only make sense for human output on a terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print the command's JSON document. No-op in human mode.
    pub fn json(&self, document: &str) {
        if self.is_json() {
            println!("{document}");
        }
    }

    /// Print a command's primary result as an unstyled line, e.g. a path
    /// meant for `$(...)`. Kept under `--quiet`, dropped in JSON mode.
    pub fn plain(&self, line: &str) {
        if !self.is_json() {
            println!("{line}");
        }
    }

    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Goes to stderr and is never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Key dimmed, value as is.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}
