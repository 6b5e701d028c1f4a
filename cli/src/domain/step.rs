//! Plan and step model.
//!
//! A `Plan` is an ordered, immutable list of `Step`s. Order is load-bearing:
//! later steps rely on directories, repositories and files created by earlier
//! ones, so steps are only ever executed one at a time, first to last.

use std::fmt;
use std::path::PathBuf;

use crate::domain::error::ProvisionError;

// ── Steps ─────────────────────────────────────────────────────────────────────

/// Where the bytes of a pushed file come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// A file compiled into the binary.
    Embedded(String),
    /// A file on the local machine.
    Local(PathBuf),
}

impl fmt::Display for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded(name) => write!(f, "embedded:{name}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Remote directory a pushed file lands in.
///
/// Each destination maps to one fixed receiver command run on the remote
/// side of the sub-session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushDestination {
    /// `hooks/` of the project's bare hub repository.
    GitHooks { project: String },
    /// The remote user's `~/.ssh` directory.
    AuthorizedKeys,
}

impl PushDestination {
    /// Remote command that receives a push record on stdin.
    #[must_use]
    pub fn receiver_command(&self) -> String {
        match self {
            Self::GitHooks { project } => {
                format!("scp -qrt ~/private/repos/{project}_hub.git/hooks")
            }
            Self::AuthorizedKeys => "scp -qrt ~/.ssh".to_string(),
        }
    }
}

/// One provisioning action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Shell command run verbatim on the remote host.
    RemoteCommand(String),
    /// Push a single small file into a fixed remote directory.
    PushFile {
        source: FileSource,
        destination: PushDestination,
        file_name: String,
    },
    /// Recreate an empty local directory.
    LocalDirSync(PathBuf),
    /// Clone a repository into an existing local directory.
    LocalGitClone { url: String, path: PathBuf },
}

impl Step {
    /// Whether the step needs a remote sub-session.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteCommand(_) | Self::PushFile { .. })
    }

    /// Short kind tag used in JSON output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RemoteCommand(_) => "remote_command",
            Self::PushFile { .. } => "push_file",
            Self::LocalDirSync(_) => "local_dir_sync",
            Self::LocalGitClone { .. } => "local_git_clone",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteCommand(command) => f.write_str(command),
            Self::PushFile {
                source,
                destination,
                file_name,
            } => write!(
                f,
                "push {source} as {file_name} via '{}'",
                destination.receiver_command()
            ),
            Self::LocalDirSync(path) => write!(f, "create directory {}", path.display()),
            Self::LocalGitClone { url, path } => {
                write!(f, "git clone {url} into {}", path.display())
            }
        }
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────────

/// Ordered, immutable list of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromIterator<Step> for Plan {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Why a failure was tolerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoredFailure {
    /// Remote command ended with a known-harmless exit.
    BenignExit { command: String, diagnostic: String },
    /// Local `git clone` exited non-zero. `status` is `None` when the process
    /// was killed by a signal.
    CloneFailed { url: String, status: Option<i32> },
}

impl fmt::Display for IgnoredFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BenignExit {
                command,
                diagnostic,
            } => write!(f, "'{command}' reported {diagnostic}"),
            Self::CloneFailed { url, status } => match status {
                Some(code) => write!(f, "git clone {url} exited with status {code}"),
                None => write!(f, "git clone {url} was terminated by a signal"),
            },
        }
    }
}

/// Result of executing one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    IgnoredFailure(IgnoredFailure),
    FatalFailure(ProvisionError),
}

impl StepOutcome {
    /// Whether this outcome aborts the plan.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalFailure(_))
    }
}

// ── Run state ─────────────────────────────────────────────────────────────────

/// Orchestrator state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Connecting,
    Running,
    Completed,
    Aborted,
}

impl RunState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }
}

/// Outcome of one dispatched step, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub index: usize,
    pub step: Step,
    pub outcome: StepOutcome,
}

/// Final report of a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub state: RunState,
    pub records: Vec<StepRecord>,
    /// Cause of an abort, including dial failures that happen before any step.
    pub failure: Option<ProvisionError>,
}

impl ProvisionReport {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == RunState::Completed
    }

    /// Outcomes in dispatch order.
    pub fn outcomes(&self) -> impl Iterator<Item = &StepOutcome> {
        self.records.iter().map(|r| &r.outcome)
    }
}
