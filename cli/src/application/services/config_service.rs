//! Application service — configuration use-cases.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::application::ports::{ConfigStore, LocalPaths};
use crate::domain::config::{SiteprepConfig, apply_config_value};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the stored configuration cannot be read or parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<SiteprepConfig> {
    store.load()
}

/// Validate `key = value`, apply it to the stored configuration and save it.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the store fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<SiteprepConfig> {
    let mut config = store.load()?;
    apply_config_value(&mut config, key, value)?;
    store.save(&config)?;
    Ok(config)
}

/// Root directory for local `<project>.dev` working copies.
///
/// Uses `local.sites_dir` when set (a leading `~/` is expanded), otherwise
/// `~/sites`.
///
/// # Errors
///
/// Returns an error if the home directory is needed but cannot be determined.
pub fn sites_dir(config: &SiteprepConfig, paths: &impl LocalPaths) -> Result<PathBuf> {
    match &config.local.sites_dir {
        Some(dir) => match dir.strip_prefix("~") {
            Ok(rest) => Ok(paths.home_dir()?.join(rest)),
            Err(_) => Ok(dir.clone()),
        },
        None => Ok(paths.home_dir()?.join("sites")),
    }
}

/// Expand a leading `~/` in a user-supplied path.
///
/// # Errors
///
/// Returns an error if the home directory is needed but cannot be determined.
pub fn expand_home(path: &Path, paths: &impl LocalPaths) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(paths.home_dir()?.join(rest)),
        Err(_) => Ok(path.to_path_buf()),
    }
}
