//! Tests for the provisioning run: connection lifecycle, dispatch order and
//! the fatal / ignorable split.

#![allow(clippy::expect_used)]

use std::path::Path;

use siteprep_cli::application::ports::SessionOutput;
use siteprep_cli::application::services::provision::provision;
use siteprep_cli::domain::classify::ExitSignal;
use siteprep_cli::domain::transfer::decode_push;
use siteprep_cli::domain::{
    FileSource, IgnoredFailure, Plan, ProvisionError, PushDestination, RunState, Step,
    StepOutcome,
};
use siteprep_cli::infra::fs::LocalFs;

use crate::helpers::credentials;
use crate::mocks::{
    Event, HOOK_BYTES, MockConnector, MockRunner, RecordingReporter, Reply, StaticAssets,
};

const HUB_URL: &str = "ssh://shop@example.com/home/shop/private/repos/shop_hub.git";
const HOOKS_RECEIVER: &str = "scp -qrt ~/private/repos/shop_hub.git/hooks";

fn four_step_plan(sites: &Path) -> Plan {
    let dir = sites.join("shop.dev");
    Plan::new(vec![
        Step::RemoteCommand("mkdir -p ~/x".to_string()),
        Step::PushFile {
            source: FileSource::Embedded("post-update-wp".to_string()),
            destination: PushDestination::GitHooks {
                project: "shop".to_string(),
            },
            file_name: "post-update".to_string(),
        },
        Step::LocalDirSync(dir.clone()),
        Step::LocalGitClone {
            url: HUB_URL.to_string(),
            path: dir,
        },
    ])
}

#[tokio::test]
async fn happy_path_runs_every_step_on_one_connection() {
    let sites = tempfile::tempdir().expect("tempdir");
    let plan = four_step_plan(sites.path());
    let connector = MockConnector::new();
    let runner = MockRunner::succeeding();
    let reporter = RecordingReporter::default();

    let report = provision(
        &connector,
        &LocalFs,
        &runner,
        &StaticAssets,
        &reporter,
        &credentials(),
        &plan,
    )
    .await;

    assert_eq!(report.state, RunState::Completed);
    assert!(report.failure.is_none());
    assert!(report.outcomes().all(|o| *o == StepOutcome::Success));
    assert_eq!(report.records.len(), 4);

    let transcript = connector.transcript();
    assert_eq!(
        transcript.events,
        vec![
            Event::Connect,
            Event::Open("mkdir -p ~/x".to_string()),
            Event::SessionClosed("mkdir -p ~/x".to_string()),
            Event::Open(HOOKS_RECEIVER.to_string()),
            Event::SessionClosed(HOOKS_RECEIVER.to_string()),
            Event::Disconnect,
        ]
    );

    assert_eq!(
        transcript.stdin_closed,
        vec!["mkdir -p ~/x".to_string(), HOOKS_RECEIVER.to_string()]
    );
    assert_eq!(transcript.pushed.len(), 1);
    let record = decode_push(&transcript.pushed[0]).expect("valid push record");
    assert_eq!(record.mode, 0o644);
    assert_eq!(record.file_name, "post-update");
    assert_eq!(record.content, HOOK_BYTES);

    let dir = sites.path().join("shop.dev");
    assert!(dir.is_dir());
    assert_eq!(std::fs::read_dir(&dir).expect("read_dir").count(), 0);

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].dir, dir);
    assert_eq!(calls[0].program, "git");
    assert_eq!(calls[0].args, vec!["clone", HUB_URL, "."]);
}

#[tokio::test]
async fn reporter_sees_connection_then_each_step() {
    let sites = tempfile::tempdir().expect("tempdir");
    let plan = four_step_plan(sites.path());
    let reporter = RecordingReporter::default();

    provision(
        &MockConnector::new(),
        &LocalFs,
        &MockRunner::succeeding(),
        &StaticAssets,
        &reporter,
        &credentials(),
        &plan,
    )
    .await;

    let mut expected = vec![
        "step: Trying connection...".to_string(),
        "success: Connection established.".to_string(),
    ];
    expected.extend(plan.steps().iter().map(|s| format!("step: {s}")));
    assert_eq!(reporter.lines(), expected);
}

#[tokio::test]
async fn benign_exit_is_ignored_and_run_continues() {
    let plan = Plan::new(vec![
        Step::RemoteCommand("cd ~/private/ && mkdir repos".to_string()),
        Step::RemoteCommand("git --bare init".to_string()),
    ]);
    let connector = MockConnector::new().reply(
        "cd ~/private/ && mkdir repos",
        Reply::Exit(SessionOutput::exited(1)),
    );
    let reporter = RecordingReporter::default();

    let report = provision(
        &connector,
        &LocalFs,
        &MockRunner::succeeding(),
        &StaticAssets,
        &reporter,
        &credentials(),
        &plan,
    )
    .await;

    assert_eq!(report.state, RunState::Completed);
    assert!(matches!(
        &report.records[0].outcome,
        StepOutcome::IgnoredFailure(IgnoredFailure::BenignExit { diagnostic, .. })
            if diagnostic == "Process exited with: 1. Reason was:  ()"
    ));
    assert_eq!(report.records[1].outcome, StepOutcome::Success);
    assert_eq!(connector.transcript().opened().len(), 2);
    assert!(reporter.lines().iter().any(|l| l.starts_with("warn: ")));
}

#[tokio::test]
async fn marker_in_transport_error_is_ignored() {
    let plan = Plan::new(vec![
        Step::RemoteCommand("first".to_string()),
        Step::RemoteCommand("second".to_string()),
    ]);
    let connector = MockConnector::new().reply(
        "first",
        Reply::WaitFails("exit status 1: Reason was:  () extra".to_string()),
    );

    let report = provision(
        &connector,
        &LocalFs,
        &MockRunner::succeeding(),
        &StaticAssets,
        &RecordingReporter::default(),
        &credentials(),
        &plan,
    )
    .await;

    assert!(report.is_completed());
    assert!(matches!(
        report.records[0].outcome,
        StepOutcome::IgnoredFailure(_)
    ));
    assert_eq!(connector.transcript().opened(), vec!["first", "second"]);
}

#[tokio::test]
async fn fatal_error_aborts_before_later_steps() {
    let sites = tempfile::tempdir().expect("tempdir");
    let dir = sites.path().join("shop.dev");
    let plan = Plan::new(vec![
        Step::RemoteCommand("ls /root".to_string()),
        Step::RemoteCommand("never".to_string()),
        Step::LocalDirSync(dir.clone()),
    ]);
    let connector =
        MockConnector::new().reply("ls /root", Reply::WaitFails("permission denied".to_string()));
    let runner = MockRunner::succeeding();

    let report = provision(
        &connector,
        &LocalFs,
        &runner,
        &StaticAssets,
        &RecordingReporter::default(),
        &credentials(),
        &plan,
    )
    .await;

    assert_eq!(report.state, RunState::Aborted);
    assert_eq!(report.records.len(), 1);
    assert_eq!(
        report.failure,
        Some(ProvisionError::Command {
            command: "ls /root".to_string(),
            diagnostic: "permission denied".to_string(),
        })
    );

    let transcript = connector.transcript();
    assert_eq!(transcript.opened(), vec!["ls /root"]);
    assert_eq!(transcript.count(&Event::Disconnect), 1);
    assert!(!dir.exists(), "local steps after the failure must not run");
}

#[tokio::test]
async fn exit_signal_is_fatal() {
    let plan = Plan::new(vec![Step::RemoteCommand("sleep 100".to_string())]);
    let connector = MockConnector::new().reply(
        "sleep 100",
        Reply::Exit(SessionOutput {
            exit_signal: Some(ExitSignal {
                name: "KILL".to_string(),
                message: "killed".to_string(),
            }),
            ..SessionOutput::default()
        }),
    );

    let report = provision(
        &connector,
        &LocalFs,
        &MockRunner::succeeding(),
        &StaticAssets,
        &RecordingReporter::default(),
        &credentials(),
        &plan,
    )
    .await;

    assert_eq!(report.state, RunState::Aborted);
    assert!(matches!(
        report.failure,
        Some(ProvisionError::Command { .. })
    ));
}

#[tokio::test]
async fn clone_failure_is_ignored_with_status() {
    let sites = tempfile::tempdir().expect("tempdir");
    let dir = sites.path().join("shop.dev");
    let plan = Plan::new(vec![
        Step::LocalDirSync(dir.clone()),
        Step::LocalGitClone {
            url: HUB_URL.to_string(),
            path: dir,
        },
        Step::RemoteCommand("echo after".to_string()),
    ]);
    let connector = MockConnector::new();

    let report = provision(
        &connector,
        &LocalFs,
        &MockRunner::exiting(128),
        &StaticAssets,
        &RecordingReporter::default(),
        &credentials(),
        &plan,
    )
    .await;

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(
        report.records[1].outcome,
        StepOutcome::IgnoredFailure(IgnoredFailure::CloneFailed {
            url: HUB_URL.to_string(),
            status: Some(128),
        })
    );
    assert_eq!(connector.transcript().opened(), vec!["echo after"]);
}

#[tokio::test]
async fn dial_failure_aborts_without_steps() {
    let plan = Plan::new(vec![Step::RemoteCommand("true".to_string())]);
    let connector = MockConnector::failing_dial("connection refused");
    let reporter = RecordingReporter::default();

    let report = provision(
        &connector,
        &LocalFs,
        &MockRunner::succeeding(),
        &StaticAssets,
        &reporter,
        &credentials(),
        &plan,
    )
    .await;

    assert_eq!(report.state, RunState::Aborted);
    assert!(report.records.is_empty());
    assert!(matches!(
        &report.failure,
        Some(ProvisionError::Dial { address, reason })
            if address == "example.com:22" && reason.contains("connection refused")
    ));
    let transcript = connector.transcript();
    assert_eq!(transcript.events, vec![Event::Connect]);
    assert_eq!(reporter.lines(), vec!["step: Trying connection..."]);
}

#[tokio::test]
async fn unreadable_push_source_aborts_before_opening_session() {
    let missing = tempfile::tempdir().expect("tempdir").path().join("id.pub");
    let plan = Plan::new(vec![Step::PushFile {
        source: FileSource::Local(missing),
        destination: PushDestination::AuthorizedKeys,
        file_name: "authorized_keys".to_string(),
    }]);
    let connector = MockConnector::new();

    let report = provision(
        &connector,
        &LocalFs,
        &MockRunner::succeeding(),
        &StaticAssets,
        &RecordingReporter::default(),
        &credentials(),
        &plan,
    )
    .await;

    assert_eq!(report.state, RunState::Aborted);
    assert!(matches!(
        report.failure,
        Some(ProvisionError::FileRead { .. })
    ));
    assert!(connector.transcript().opened().is_empty());
}

#[tokio::test]
async fn empty_plan_completes_after_connecting() {
    let connector = MockConnector::new();
    let report = provision(
        &connector,
        &LocalFs,
        &MockRunner::succeeding(),
        &StaticAssets,
        &RecordingReporter::default(),
        &credentials(),
        &Plan::default(),
    )
    .await;

    assert!(report.is_completed());
    assert_eq!(
        connector.transcript().events,
        vec![Event::Connect, Event::Disconnect]
    );
}
