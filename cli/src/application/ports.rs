//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::classify::{ExitSignal, exit_diagnostic};
use crate::domain::{Credentials, SiteprepConfig};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Upper bound on captured stdout/stderr per command. Excess bytes are dropped.
pub const MAX_CAPTURED_OUTPUT: usize = 64 * 1024;

// ── Remote Port Traits ────────────────────────────────────────────────────────

/// Write half of a remote command's standard input.
///
/// Shutting it down signals end-of-stream to the remote process.
pub type RemoteStdin = Box<dyn tokio::io::AsyncWrite + Send + Unpin>;

/// Output of a finished remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOutput {
    /// Captured stdout, at most [`MAX_CAPTURED_OUTPUT`] bytes.
    pub stdout: Vec<u8>,
    /// Captured stderr, at most [`MAX_CAPTURED_OUTPUT`] bytes.
    pub stderr: Vec<u8>,
    /// Exit status reported by the server, if any.
    pub exit_status: Option<u32>,
    /// Signal that terminated the command, if any.
    pub exit_signal: Option<ExitSignal>,
}

impl SessionOutput {
    /// Output of a command that exited with `status` and no signal.
    #[must_use]
    pub fn exited(status: u32) -> Self {
        Self {
            exit_status: Some(status),
            ..Self::default()
        }
    }

    /// Diagnostic text when the command did not exit cleanly.
    #[must_use]
    pub fn failure(&self) -> Option<String> {
        exit_diagnostic(self.exit_status, self.exit_signal.as_ref())
    }
}

/// A sub-session running exactly one remote command.
#[allow(async_fn_in_trait)]
pub trait RemoteSession {
    /// Take the command's stdin. Returns `None` once taken.
    ///
    /// Dropping the writer does not end the stream; only `shutdown` does.
    fn take_stdin(&mut self) -> Option<RemoteStdin>;
    /// Wait for the command to finish, collect its output and close the
    /// sub-session. A stdin that was never taken is ended first.
    async fn wait(self) -> Result<SessionOutput>;
    /// Close the sub-session without waiting for the command.
    async fn close(self) -> Result<()>;
}

/// One authenticated connection to the remote host.
///
/// Sub-sessions are opened one at a time; the connection itself is never
/// handed out.
#[allow(async_fn_in_trait)]
pub trait RemoteConnection {
    type Session: RemoteSession;
    /// Open a sub-session and start `command` verbatim.
    async fn open_session(&self, command: &str) -> Result<Self::Session>;
    /// Tear the connection down.
    async fn close(self) -> Result<()>;
}

/// Dials and authenticates connections.
#[allow(async_fn_in_trait)]
pub trait RemoteConnector {
    type Connection: RemoteConnection;
    /// Dial `credentials.host:port` and authenticate.
    async fn connect(&self, credentials: &Credentials) -> Result<Self::Connection>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts local process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `program` with `dir` as its working directory and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or waited on. A
    /// non-zero exit is not an error.
    async fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Filesystem Ports ──────────────────────────────────────────────────────────

/// Abstracts local filesystem operations used by local plan steps.
pub trait LocalFs {
    /// Whether anything (file, directory or dangling symlink) is at `path`.
    fn exists(&self, path: &Path) -> bool;
    /// Whether `path` is a directory (symlinks are not followed).
    fn is_dir(&self, path: &Path) -> bool;
    /// Create a single directory level with the given permission `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent is missing or `path` already exists.
    fn create_dir(&self, path: &Path, mode: u32) -> Result<()>;
    /// Remove a directory and everything under it.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    /// Remove a single file or symlink.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_file(&self, path: &Path) -> Result<()>;
    /// Read a whole file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Abstracts access to files compiled into the binary.
pub trait AssetSource {
    /// Raw bytes of a single embedded asset.
    ///
    /// # Errors
    ///
    /// Returns an error if no asset with the given `name` exists.
    fn get_asset(&self, name: &str) -> Result<&'static [u8]>;
}

/// Abstracts local filesystem paths.
pub trait LocalPaths {
    /// Home directory of the invoking user.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn home_dir(&self) -> Result<PathBuf>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<SiteprepConfig>;
    /// Persist the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &SiteprepConfig) -> Result<()>;
    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}
