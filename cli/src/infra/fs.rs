//! Filesystem infrastructure — implements `LocalFs` and `LocalPaths`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::LocalPaths;

/// Production filesystem implementation of the `LocalFs` port.
pub struct LocalFs;

impl crate::application::ports::LocalFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling symlink still counts as present.
        std::fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path).is_ok_and(|m| m.is_dir())
    }

    fn create_dir(&self, path: &Path, mode: u32) -> Result<()> {
        let mut builder = std::fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;
        builder
            .create(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("removing directory {}", path.display()))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).with_context(|| format!("removing file {}", path.display()))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).with_context(|| format!("reading {}", path.display()))
    }
}

impl LocalPaths for LocalFs {
    fn home_dir(&self) -> Result<PathBuf> {
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))
    }
}
