//! YAML file implementation of the `ConfigStore` port.
//!
//! The file lives at `$SITEPREP_CONFIG`, or `~/.siteprep/config.yaml`. Saves
//! write a sibling `.tmp` file and rename it over the real one.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{ConfigStore, LocalPaths};
use crate::domain::config::{SiteprepConfig, validate_config_value};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SITEPREP_CONFIG";

/// Permission bits of the saved file.
const CONFIG_FILE_MODE: u32 = 0o600;

/// Config store backed by one YAML file.
pub struct YamlConfigStore {
    /// `None` when there is no override and no home directory.
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Resolve the file location from `SITEPREP_CONFIG` or the home directory.
    #[must_use]
    pub fn locate(paths: &impl LocalPaths) -> Self {
        let path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(custom) if !custom.is_empty() => Some(PathBuf::from(custom)),
            _ => paths
                .home_dir()
                .ok()
                .map(|home| home.join(".siteprep").join("config.yaml")),
        };
        Self { path }
    }

    /// Store backed by exactly `path`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<SiteprepConfig> {
        let path = self.path()?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SiteprepConfig::default());
            }
            Err(e) => return Err(e).with_context(|| format!("cannot read {}", path.display())),
        };
        let config: SiteprepConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        check_loaded(&config).with_context(|| format!("invalid setting in {}", path.display()))?;
        Ok(config)
    }

    fn save(&self, config: &SiteprepConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;

        let staged = staging_path(&path)?;
        write_owner_only(&staged, content.as_bytes())
            .with_context(|| format!("cannot write {}", staged.display()))?;
        if let Err(e) = std::fs::rename(&staged, &path) {
            let _ = std::fs::remove_file(&staged);
            return Err(e).with_context(|| format!("cannot replace {}", path.display()));
        }
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        self.path.clone().ok_or_else(|| {
            anyhow::anyhow!("cannot determine home directory; set {CONFIG_PATH_ENV}")
        })
    }
}

/// Values that serde accepts but the commands would choke on later.
fn check_loaded(config: &SiteprepConfig) -> Result<()> {
    validate_config_value("defaults.port", &config.defaults.port.to_string())?;
    if let Some(dir) = &config.local.sites_dir {
        validate_config_value("local.sites_dir", &dir.to_string_lossy())?;
    }
    Ok(())
}

fn staging_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .with_context(|| format!("config path {} has no file name", path.display()))?;
    let mut staged = name.to_os_string();
    staged.push(".tmp");
    Ok(path.with_file_name(staged))
}

fn write_owner_only(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(CONFIG_FILE_MODE);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
