//! Shared test helpers: output constructors and sample project values.

#![allow(dead_code)]

use std::process::{ExitStatus, Output};

use siteprep_cli::domain::{AuthSecret, Credentials, Project, ProjectKind};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

/// `ExitStatus` of a process killed by `signal` (no exit code).
#[cfg(unix)]
pub fn killed_by(signal: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(signal)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Sample values ────────────────────────────────────────────────────────────

pub fn project() -> Project {
    Project {
        name: "shop".to_string(),
        host: "example.com".to_string(),
        port: 22,
        user: "shop".to_string(),
        kind: ProjectKind::WordPress,
    }
}

pub fn credentials() -> Credentials {
    Credentials::for_project(&project(), AuthSecret::Password("hunter22".to_string()))
}
