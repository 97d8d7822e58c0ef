//! Single-writer run lock.
//!
//! A lock file created with `create_new` guards the whole run; a second
//! concurrent run fails fast instead of interleaving record writes. The
//! file is removed when the guard drops, including on error paths.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use pressmill_shared::{PressmillError, Result};

const LOCK_FILE_NAME: &str = ".pressmill.lock";

/// Held for the duration of a run; removing the file on drop releases it.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Acquire the lock in `dir`, creating the directory if needed. An
    /// existing lock file means another run is active (or a previous run
    /// was killed; the error names the file to remove).
    pub fn acquire(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| PressmillError::io(dir, e))?;
        let path = dir.join(LOCK_FILE_NAME);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(_) => {
                debug!(path = %path.display(), "run lock acquired");
                Ok(Self { path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(PressmillError::validation(format!(
                    "another run appears to be active (lock file {}); \
                     remove it if no run is in progress",
                    path.display()
                )))
            }
            Err(e) => Err(PressmillError::io(&path, e)),
        }
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove run lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_and_release() {
        let tmp = tempfile::tempdir().unwrap();
        let lock_path = tmp.path().join(LOCK_FILE_NAME);

        {
            let _lock = RunLock::acquire(tmp.path()).unwrap();
            assert!(lock_path.exists());
        }
        assert!(!lock_path.exists());
    }

    #[test]
    fn second_acquire_fails_while_held() {
        let tmp = tempfile::tempdir().unwrap();
        let _lock = RunLock::acquire(tmp.path()).unwrap();

        let err = RunLock::acquire(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("another run appears to be active"));
    }

    #[test]
    fn lock_is_reacquirable_after_release() {
        let tmp = tempfile::tempdir().unwrap();
        drop(RunLock::acquire(tmp.path()).unwrap());
        assert!(RunLock::acquire(tmp.path()).is_ok());
    }
}
