//! Application service — the provisioning run.
//!
//! Owns the connection for the whole run and walks the plan strictly in
//! order. Imports only from `crate::domain` and `crate::application`.

use tracing::{debug, info, warn};

use crate::application::ports::{
    AssetSource, CommandRunner, LocalFs, ProgressReporter, RemoteConnection, RemoteConnector,
};
use crate::application::services::local_actions::{clone_repository, sync_directory};
use crate::application::services::remote_runner::{push_file, run_remote};
use crate::domain::{
    Credentials, FileSource, Plan, ProvisionError, ProvisionReport, RunState, Step, StepOutcome,
    StepRecord,
};

/// Connect, execute every step of `plan` in order, and close the connection.
///
/// Stops at the first fatal outcome; steps already applied are left as they
/// are. The returned report is `Completed` only if every step ran without a
/// fatal outcome.
pub async fn provision(
    connector: &impl RemoteConnector,
    local_fs: &impl LocalFs,
    runner: &impl CommandRunner,
    assets: &impl AssetSource,
    reporter: &impl ProgressReporter,
    credentials: &Credentials,
    plan: &Plan,
) -> ProvisionReport {
    let mut state = RunState::Idle;
    advance(&mut state, RunState::Connecting);

    reporter.step("Trying connection...");
    let connection = match connector.connect(credentials).await {
        Ok(connection) => connection,
        Err(e) => {
            advance(&mut state, RunState::Aborted);
            return ProvisionReport {
                state,
                records: Vec::new(),
                failure: Some(ProvisionError::Dial {
                    address: credentials.address(),
                    reason: format!("{e:#}"),
                }),
            };
        }
    };
    reporter.success("Connection established.");
    advance(&mut state, RunState::Running);

    let mut records = Vec::with_capacity(plan.len());
    let mut failure = None;
    for (index, step) in plan.steps().iter().enumerate() {
        reporter.step(&step.to_string());
        let outcome = dispatch_step(&connection, local_fs, runner, assets, step).await;
        let stop = outcome.is_fatal();
        match &outcome {
            StepOutcome::Success => {}
            StepOutcome::IgnoredFailure(reason) => reporter.warn(&reason.to_string()),
            StepOutcome::FatalFailure(err) => failure = Some(err.clone()),
        }
        records.push(StepRecord {
            index,
            step: step.clone(),
            outcome,
        });
        if stop {
            break;
        }
    }

    if let Err(e) = connection.close().await {
        warn!(error = %format!("{e:#}"), "closing connection failed");
    }

    advance(
        &mut state,
        if failure.is_some() {
            RunState::Aborted
        } else {
            RunState::Completed
        },
    );
    ProvisionReport {
        state,
        records,
        failure,
    }
}

/// Route one step to the remote runner or the local executor.
pub async fn dispatch_step(
    connection: &impl RemoteConnection,
    local_fs: &impl LocalFs,
    runner: &impl CommandRunner,
    assets: &impl AssetSource,
    step: &Step,
) -> StepOutcome {
    match step {
        Step::RemoteCommand(command) => run_remote(connection, command).await,
        Step::PushFile {
            source,
            destination,
            file_name,
        } => match load_source(local_fs, assets, source) {
            Ok(content) => {
                push_file(
                    connection,
                    &content,
                    file_name,
                    &destination.receiver_command(),
                )
                .await
            }
            Err(err) => StepOutcome::FatalFailure(err),
        },
        Step::LocalDirSync(path) => sync_directory(local_fs, path),
        Step::LocalGitClone { url, path } => clone_repository(local_fs, runner, url, path).await,
    }
}

fn load_source(
    local_fs: &impl LocalFs,
    assets: &impl AssetSource,
    source: &FileSource,
) -> Result<Vec<u8>, ProvisionError> {
    let loaded = match source {
        FileSource::Embedded(name) => assets.get_asset(name).map(<[u8]>::to_vec),
        FileSource::Local(path) => local_fs.read(path),
    };
    loaded.map_err(|e| ProvisionError::FileRead {
        path: source.to_string(),
        reason: format!("{e:#}"),
    })
}

fn advance(state: &mut RunState, next: RunState) {
    debug!(from = state.as_str(), to = next.as_str(), "run state");
    if matches!(next, RunState::Completed | RunState::Aborted) {
        info!(state = next.as_str(), "provisioning finished");
    }
    *state = next;
}
