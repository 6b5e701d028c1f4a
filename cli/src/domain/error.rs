//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Fatal causes that abort a provisioning run.
///
/// Causes are carried as rendered strings so outcomes stay `Clone` and can be
/// compared in tests and serialized in reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    #[error("Failed to dial {address}: {reason}")]
    Dial { address: String, reason: String },

    #[error("Failed to build session for '{command}': {reason}")]
    Session { command: String, reason: String },

    #[error("Command '{command}' failed on execution: {diagnostic}")]
    Command { command: String, diagnostic: String },

    #[error("Cannot read '{path}': {reason}")]
    FileRead { path: String, reason: String },

    #[error("Failed to stream '{file_name}' to the remote receiver: {reason}")]
    Transfer { file_name: String, reason: String },

    #[error("Filesystem action on {path} failed: {reason}")]
    LocalFilesystem { path: String, reason: String },

    #[error("Failed to execute git clone in {path}: {reason}")]
    CloneSpawn { path: String, reason: String },
}

impl ProvisionError {
    /// Stable machine-readable code for JSON output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Dial { .. } => "DIAL",
            Self::Session { .. } => "SESSION",
            Self::Command { .. } => "COMMAND",
            Self::FileRead { .. } => "FILE_READ",
            Self::Transfer { .. } => "TRANSFER",
            Self::LocalFilesystem { .. } => "LOCAL_FS",
            Self::CloneSpawn { .. } => "CLONE_SPAWN",
        }
    }
}

// ── Push framing errors ───────────────────────────────────────────────────────

/// Errors from encoding or decoding a push record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Invalid push file name {0:?}: must be non-empty without '/' or line breaks")]
    InvalidFileName(String),

    #[error("Malformed push stream: {0}")]
    Malformed(String),
}

// ── Input errors ──────────────────────────────────────────────────────────────

/// Rejected project input. Messages are shown verbatim at the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Make sure you type a valid name for your project (3 to 20 letters, digits, '-' or '_').")]
    ProjectName,

    #[error("Make sure you type a valid hostname for your project, e.g. example.com or example.pt.")]
    Host,

    #[error("Type a valid password. It must be longer than 6 characters.")]
    Password,

    #[error("Only digits allowed for the port: min 1, max 9999.")]
    Port,

    #[error("Pay attention to the options: 1 (Yii) or 2 (WordPress / Hugo).")]
    ProjectType,

    #[error("The remote user must be 3 to 20 letters, digits, '-' or '_'.")]
    User,

    #[error("Missing {0}. Pass it as a flag or run without --yes to be prompted.")]
    Missing(&'static str),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
