//! Tokio implementation of the `CommandRunner` port.

use std::path::Path;
use std::process::{Output, Stdio};

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::application::ports::{CommandRunner, MAX_CAPTURED_OUTPUT};

/// Production `CommandRunner`. Spawns through tokio and kills the child if
/// the future is dropped.
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<Output> {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program} in {}", dir.display()))?;

        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        // Drain both pipes while waiting, or a chatty child blocks on a full pipe.
        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            read_bounded(stdout_handle),
            read_bounded(stderr_handle),
        );
        Ok(Output {
            status: status.with_context(|| format!("waiting for {program}"))?,
            stdout,
            stderr,
        })
    }
}

/// Read a pipe to the end, keeping at most [`MAX_CAPTURED_OUTPUT`] bytes.
async fn read_bounded(handle: Option<impl AsyncRead + Unpin>) -> Vec<u8> {
    let mut kept = Vec::new();
    let Some(mut handle) = handle else {
        return kept;
    };
    let mut chunk = [0u8; 8192];
    loop {
        match handle.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let room = MAX_CAPTURED_OUTPUT.saturating_sub(kept.len());
                kept.extend_from_slice(&chunk[..n.min(room)]);
            }
        }
    }
    kept
}
