//! Failure classification for remote commands.
//!
//! Some tools (git, chmod) finish their work but still end with a plain
//! non-zero exit over an exec channel. Those exits render with an empty
//! reason and signal, and only that exact shape is tolerated.

/// Marker found in the diagnostic of a plain non-zero exit.
pub const IGNORED_FAILURE_MARKER: &str = "Reason was:  ()";

/// Verdict for a failed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The command completed its effect; keep going.
    Ignorable,
    /// Abort the plan.
    Fatal,
}

/// Classify a failure by its diagnostic text.
#[must_use]
pub fn classify_failure(diagnostic: &str) -> FailureClass {
    if diagnostic.contains(IGNORED_FAILURE_MARKER) {
        FailureClass::Ignorable
    } else {
        FailureClass::Fatal
    }
}

/// Signal that terminated a remote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitSignal {
    pub name: String,
    pub message: String,
}

/// Render the diagnostic for a finished remote command, or `None` when it
/// exited cleanly.
///
/// The shape is `Process exited with: <status>. Reason was: <message> (<signal>)`,
/// so a plain non-zero exit carries [`IGNORED_FAILURE_MARKER`] and an exit by
/// signal does not.
#[must_use]
pub fn exit_diagnostic(status: Option<u32>, signal: Option<&ExitSignal>) -> Option<String> {
    match (status, signal) {
        (Some(0), None) => None,
        (Some(code), None) => Some(format!("Process exited with: {code}. Reason was:  ()")),
        (code, Some(sig)) => Some(format!(
            "Process exited with: {}. Reason was: {} ({})",
            code.map_or_else(|| "-1".to_string(), |c| c.to_string()),
            sig.message,
            sig.name
        )),
        (None, None) => {
            Some("remote command exited without exit status or exit signal".to_string())
        }
    }
}
