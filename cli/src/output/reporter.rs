//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! On a TTY each step is shown as a spinner that settles into `✓`, `!` or
//! `✗`; otherwise steps are printed as plain `→` lines.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// All output is suppressed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<(ProgressBar, String)>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    /// Settle the spinner of the last step, if any.
    ///
    /// `ok = false` marks it as the step that aborted the run.
    pub fn finish(&self, ok: bool) {
        if let Some((pb, msg)) = self.active.borrow_mut().take() {
            if ok {
                progress::finish_ok(&pb, &msg);
            } else {
                progress::finish_error(&pb, &msg);
            }
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        self.finish(true);
        if self.ctx.show_progress() {
            let pb = progress::spinner(message);
            *self.active.borrow_mut() = Some((pb, message.to_string()));
        } else {
            println!("  {} {message}", "→".style(self.ctx.styles.info));
        }
    }

    fn success(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        match self.active.borrow_mut().take() {
            Some((pb, _)) => progress::finish_ok(&pb, message),
            None => println!("  {} {message}", "✓".style(self.ctx.styles.success)),
        }
    }

    fn warn(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        if let Some((pb, step)) = self.active.borrow_mut().take() {
            progress::finish_warn(&pb, &step);
        }
        println!("  {} {message}", "!".style(self.ctx.styles.warning));
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some((pb, _)) = self.active.get_mut().take() {
            pb.finish_and_clear();
        }
    }
}
