//! Domain types and validators for siteprep configuration.
//!
//! Pure functions only. No I/O or async.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::project::DEFAULT_SSH_PORT;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &["defaults.port", "local.sites_dir", "ssh.host_keys"];
pub const VALID_HOST_KEY_POLICIES: &[&str] = &["accept-new", "strict", "insecure"];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.siteprep/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SiteprepConfig {
    /// Defaults applied to prompts and flags.
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Local machine layout.
    #[serde(default)]
    pub local: LocalConfig,
    /// SSH transport settings.
    #[serde(default)]
    pub ssh: SshConfig,
}

/// Input defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DefaultsConfig {
    /// Port used when none is given.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

/// Local layout settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LocalConfig {
    /// Root for `<project>.dev` working copies. `~/sites` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sites_dir: Option<PathBuf>,
}

/// SSH settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SshConfig {
    /// Host key policy: `accept-new` (default), `strict`, or `insecure`.
    #[serde(default = "default_host_key_policy")]
    pub host_keys: HostKeyPolicy,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            host_keys: default_host_key_policy(),
        }
    }
}

fn default_host_key_policy() -> HostKeyPolicy {
    HostKeyPolicy::AcceptNew
}

/// How the server's host key is checked against `~/.ssh/known_hosts`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HostKeyPolicy {
    /// Learn unknown keys, reject changed ones.
    AcceptNew,
    /// Reject unknown and changed keys.
    Strict,
    /// Accept any key.
    Insecure,
}

impl HostKeyPolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AcceptNew => "accept-new",
            Self::Strict => "strict",
            Self::Insecure => "insecure",
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let valid = match key {
        "defaults.port" => {
            if crate::domain::project::parse_port(value, 0).is_ok_and(|p| p > 0) {
                return Ok(());
            }
            "1-9999".to_string()
        }
        "ssh.host_keys" => {
            if VALID_HOST_KEY_POLICIES.contains(&value) {
                return Ok(());
            }
            VALID_HOST_KEY_POLICIES.join(", ")
        }
        "local.sites_dir" => {
            if !value.trim().is_empty() {
                return Ok(());
            }
            "a non-empty directory path".to_string()
        }
        _ => return Ok(()),
    };
    Err(ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        valid,
    }
    .into())
}

/// Apply an already-validated `key = value` to `config`.
///
/// # Errors
///
/// Returns an error if the key or value is invalid.
pub fn apply_config_value(config: &mut SiteprepConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    match key {
        "defaults.port" => config.defaults.port = crate::domain::project::parse_port(value, 0)?,
        "local.sites_dir" => config.local.sites_dir = Some(PathBuf::from(value.trim())),
        "ssh.host_keys" => {
            config.ssh.host_keys = match value {
                "strict" => HostKeyPolicy::Strict,
                "insecure" => HostKeyPolicy::Insecure,
                _ => HostKeyPolicy::AcceptNew,
            };
        }
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
