//! Application service — running remote steps over a borrowed connection.
//!
//! Every call opens exactly one sub-session and closes it before returning.

use anyhow::Result;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::application::ports::{RemoteConnection, RemoteSession, SessionOutput};
use crate::domain::classify::{FailureClass, classify_failure};
use crate::domain::transfer::{PUSH_FILE_MODE, encode_push};
use crate::domain::{IgnoredFailure, ProvisionError, StepOutcome};

/// Run `command` verbatim in a fresh sub-session.
///
/// The command gets an empty stdin: it is shut down before waiting, so a
/// command that reads stdin sees end-of-stream instead of blocking.
pub async fn run_remote(connection: &impl RemoteConnection, command: &str) -> StepOutcome {
    let mut session = match connection.open_session(command).await {
        Ok(session) => session,
        Err(e) => return session_failure(command, &e),
    };
    if let Some(mut stdin) = session.take_stdin() {
        if let Err(e) = stdin.shutdown().await {
            debug!(command, error = %e, "closing remote stdin failed");
        }
    }
    classify_result(command, session.wait().await)
}

/// Push `content` as `file_name` through the receiver started by
/// `destination_command`.
///
/// The receiver only drains its stdin while the sub-session runs, so the
/// encoded record is written by a separate task while this one waits on the
/// session. The writer always shuts stdin down, and is joined before the
/// outcome is returned.
pub async fn push_file(
    connection: &impl RemoteConnection,
    content: &[u8],
    file_name: &str,
    destination_command: &str,
) -> StepOutcome {
    let payload = match encode_push(content, file_name, PUSH_FILE_MODE) {
        Ok(payload) => payload,
        Err(e) => return transfer_failure(file_name, &e.to_string()),
    };

    let mut session = match connection.open_session(destination_command).await {
        Ok(session) => session,
        Err(e) => return session_failure(destination_command, &e),
    };

    let Some(mut stdin) = session.take_stdin() else {
        if let Err(e) = session.close().await {
            debug!(error = %format!("{e:#}"), "closing sub-session without stdin");
        }
        return transfer_failure(file_name, "receiver session has no stdin");
    };

    debug!(file_name, bytes = payload.len(), "streaming push record");
    let producer = tokio::spawn(async move {
        let written = stdin.write_all(&payload).await;
        let closed = stdin.shutdown().await;
        written.and(closed)
    });

    let result = session.wait().await;
    let produced = producer.await;

    match (classify_result(destination_command, result), produced) {
        (StepOutcome::Success, Ok(Err(e))) => transfer_failure(file_name, &e.to_string()),
        (StepOutcome::Success, Err(e)) => transfer_failure(file_name, &e.to_string()),
        (outcome, _) => outcome,
    }
}

fn classify_result(command: &str, result: Result<SessionOutput>) -> StepOutcome {
    let diagnostic = match result {
        Ok(output) => {
            debug!(
                command,
                stdout_bytes = output.stdout.len(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                exit_status = ?output.exit_status,
                "remote command finished"
            );
            match output.failure() {
                None => return StepOutcome::Success,
                Some(diagnostic) => diagnostic,
            }
        }
        Err(e) => format!("{e:#}"),
    };

    match classify_failure(&diagnostic) {
        FailureClass::Ignorable => {
            warn!(command, %diagnostic, "ignoring benign non-zero exit");
            StepOutcome::IgnoredFailure(IgnoredFailure::BenignExit {
                command: command.to_string(),
                diagnostic,
            })
        }
        FailureClass::Fatal => StepOutcome::FatalFailure(ProvisionError::Command {
            command: command.to_string(),
            diagnostic,
        }),
    }
}

fn session_failure(command: &str, err: &anyhow::Error) -> StepOutcome {
    StepOutcome::FatalFailure(ProvisionError::Session {
        command: command.to_string(),
        reason: format!("{err:#}"),
    })
}

fn transfer_failure(file_name: &str, reason: &str) -> StepOutcome {
    StepOutcome::FatalFailure(ProvisionError::Transfer {
        file_name: file_name.to_string(),
        reason: reason.to_string(),
    })
}
