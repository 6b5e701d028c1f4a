//! Project input: validation rules, defaults and the credentials derived
//! from them.
//!
//! Pure functions only. Prompting lives in `commands::input`.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::InputError;

/// Default SSH port used when the user leaves the port empty.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// The project name is interpolated into remote shell commands, so only a
/// conservative character set is accepted.
pub static PROJECT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{2,19}$").expect("valid regex")
});

/// Dotted hostname or IPv4 literal.
pub static HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("valid regex")
});

// ── Project kind ─────────────────────────────────────────────────────────────

/// Supported project types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Yii,
    /// WordPress and goHugo sites share one setup.
    WordPress,
}

impl ProjectKind {
    pub const ALL: [Self; 2] = [Self::Yii, Self::WordPress];

    /// Embedded `post-update` hook shipped for this kind.
    #[must_use]
    pub fn hook_asset(self) -> &'static str {
        match self {
            Self::Yii => "post-update-yii",
            Self::WordPress => "post-update-wp",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Yii => "Yii",
            Self::WordPress => "WP or goHugo",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a project name: 3 to 20 characters from `[A-Za-z0-9_-]`.
///
/// # Errors
///
/// Returns [`InputError::ProjectName`] when the name does not match.
pub fn validate_project_name(input: &str) -> Result<String, InputError> {
    let name = input.trim();
    if PROJECT_NAME_RE.is_match(name) {
        Ok(name.to_string())
    } else {
        Err(InputError::ProjectName)
    }
}

/// Validates a hostname: longer than 5 characters and dotted.
///
/// # Errors
///
/// Returns [`InputError::Host`] when the host is too short or malformed.
pub fn validate_host(input: &str) -> Result<String, InputError> {
    let host = input.trim();
    if host.len() > 5 && HOST_RE.is_match(host) {
        Ok(host.to_string())
    } else {
        Err(InputError::Host)
    }
}

/// Validates a password: longer than 6 characters.
///
/// # Errors
///
/// Returns [`InputError::Password`] when the password is too short.
pub fn validate_password(input: &str) -> Result<String, InputError> {
    if input.chars().count() > 6 {
        Ok(input.to_string())
    } else {
        Err(InputError::Password)
    }
}

/// Parses a port. Empty input yields `default`.
///
/// # Errors
///
/// Returns [`InputError::Port`] for non-digits, more than four digits, or 0.
pub fn parse_port(input: &str, default: u16) -> Result<u16, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(default);
    }
    if input.len() > 4 || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(InputError::Port);
    }
    match input.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(InputError::Port),
    }
}

/// Parses a project type from the menu number or its name.
///
/// # Errors
///
/// Returns [`InputError::ProjectType`] for anything else.
pub fn parse_project_kind(input: &str) -> Result<ProjectKind, InputError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "yii" => Ok(ProjectKind::Yii),
        "2" | "wp" | "wordpress" | "hugo" | "gohugo" => Ok(ProjectKind::WordPress),
        _ => Err(InputError::ProjectType),
    }
}

// ── Project and credentials ──────────────────────────────────────────────────

/// Validated project description used to build a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub host: String,
    pub port: u16,
    /// Remote login. Hosting accounts are named after the project by default.
    pub user: String,
    pub kind: ProjectKind,
}

impl Project {
    /// Local working copy directory name, e.g. `shop.dev`.
    #[must_use]
    pub fn local_dir_name(&self) -> String {
        format!("{}.dev", self.name)
    }

    /// URL of the bare hub repository the local working copy clones from.
    #[must_use]
    pub fn hub_url(&self) -> String {
        let authority = if self.port == DEFAULT_SSH_PORT {
            format!("{}@{}", self.user, self.host)
        } else {
            format!("{}@{}:{}", self.user, self.host, self.port)
        };
        format!(
            "ssh://{authority}/home/{}/private/repos/{}_hub.git",
            self.user, self.name
        )
    }
}

/// Authentication secret. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthSecret {
    Password(String),
    /// Private key file, optionally protected by a passphrase.
    KeyFile {
        path: PathBuf,
        passphrase: Option<String>,
    },
}

impl fmt::Debug for AuthSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Password(<redacted>)"),
            Self::KeyFile { path, .. } => f
                .debug_struct("KeyFile")
                .field("path", path)
                .field("passphrase", &"<redacted>")
                .finish(),
        }
    }
}

/// Everything needed to open the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub host: String,
    pub port: u16,
    pub secret: AuthSecret,
}

impl Credentials {
    #[must_use]
    pub fn for_project(project: &Project, secret: AuthSecret) -> Self {
        Self {
            user: project.user.clone(),
            host: project.host.clone(),
            port: project.port,
            secret,
        }
    }

    /// `host:port` as dialed.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
