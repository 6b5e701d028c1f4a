//! Application service — local steps that mirror the remote setup.

use std::path::Path;

use tracing::{debug, warn};

use crate::application::ports::{CommandRunner, LocalFs};
use crate::domain::{IgnoredFailure, ProvisionError, StepOutcome};

/// Permission mode for recreated project directories.
pub const LOCAL_DIR_MODE: u32 = 0o755;

/// Removal attempts before giving up on a path that keeps reappearing.
pub const MAX_RECREATE_ATTEMPTS: usize = 3;

/// Leave exactly one empty directory at `path`.
///
/// Whatever is already there (file, symlink or directory tree) is removed
/// first. Only a single level is created; the parent must exist.
pub fn sync_directory(fs: &impl LocalFs, path: &Path) -> StepOutcome {
    let mut removals = 0;
    while fs.exists(path) {
        if removals == MAX_RECREATE_ATTEMPTS {
            return StepOutcome::FatalFailure(ProvisionError::LocalFilesystem {
                path: path.display().to_string(),
                reason: format!("still present after {removals} removals"),
            });
        }
        removals += 1;
        debug!(path = %path.display(), removals, "already exists, removing old entry");
        let removed = if fs.is_dir(path) {
            fs.remove_dir_all(path)
        } else {
            fs.remove_file(path)
        };
        if let Err(e) = removed {
            return fs_failure(path, &e);
        }
    }

    match fs.create_dir(path, LOCAL_DIR_MODE) {
        Ok(()) => {
            debug!(path = %path.display(), "directory created");
            StepOutcome::Success
        }
        Err(e) => fs_failure(path, &e),
    }
}

/// Clone `url` into the existing directory `path`.
///
/// A non-zero `git` exit is tolerated and reported with its status; only a
/// missing directory or an unrunnable `git` aborts the plan.
pub async fn clone_repository(
    fs: &impl LocalFs,
    runner: &impl CommandRunner,
    url: &str,
    path: &Path,
) -> StepOutcome {
    if !fs.is_dir(path) {
        return StepOutcome::FatalFailure(ProvisionError::LocalFilesystem {
            path: path.display().to_string(),
            reason: "Failed to change directory: not an existing directory".to_string(),
        });
    }

    match runner.run_in(path, "git", &["clone", url, "."]).await {
        Ok(output) if output.status.success() => StepOutcome::Success,
        Ok(output) => {
            let status = output.status.code();
            warn!(
                url,
                ?status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git clone failed"
            );
            StepOutcome::IgnoredFailure(IgnoredFailure::CloneFailed {
                url: url.to_string(),
                status,
            })
        }
        Err(e) => StepOutcome::FatalFailure(ProvisionError::CloneSpawn {
            path: path.display().to_string(),
            reason: format!("{e:#}"),
        }),
    }
}

fn fs_failure(path: &Path, err: &anyhow::Error) -> StepOutcome {
    StepOutcome::FatalFailure(ProvisionError::LocalFilesystem {
        path: path.display().to_string(),
        reason: format!("{err:#}"),
    })
}
