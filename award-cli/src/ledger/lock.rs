//! Advisory lock file guarding ledger read-modify-write cycles
//!
//! The lock is a sibling file `<ledger>.lock` created with `create_new`, so
//! only one run can hold it. A held lock fails the run immediately; there is
//! no waiting and no stale-lock takeover.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::AwardError;

/// Held while a run reads and rewrites the ledger; released on drop
#[derive(Debug)]
pub struct LedgerLock {
    path: PathBuf,
    released: bool,
}

impl LedgerLock {
    /// Lock file path for a ledger
    pub fn lock_path(ledger: &Path) -> PathBuf {
        let mut name = ledger
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        ledger.with_file_name(name)
    }

    pub fn acquire(ledger: &Path) -> Result<Self> {
        let path = Self::lock_path(ledger);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(AwardError::LedgerLocked { path }.into());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to create lock file: {}", path.display()));
            }
        };

        let holder = format!(
            "pid={} acquired={}\n",
            std::process::id(),
            chrono::Local::now().to_rfc3339()
        );
        // The lock is held once the file exists; the holder line is informational.
        if let Err(e) = file.write_all(holder.as_bytes()) {
            log::warn!("Could not record lock holder in {}: {}", path.display(), e);
        }

        log::debug!("Acquired ledger lock {}", path.display());
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the lock file, reporting failure
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        std::fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove lock file: {}", self.path.display()))?;
        log::debug!("Released ledger lock {}", self.path.display());
        Ok(())
    }
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            log::warn!("Failed to remove lock file {}: {}", self.path.display(), e);
        }
    }
}
