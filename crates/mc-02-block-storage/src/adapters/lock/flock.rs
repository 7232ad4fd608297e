//! # File Lock Implementation
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on Windows).

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::errors::KVStoreError;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors from database locking
#[derive(Debug)]
pub enum LockError {
    /// Lock file could not be created
    CreateFailed(io::Error),
    /// Store is already locked by another handle
    AlreadyLocked { pid: Option<u32>, path: PathBuf },
    /// Failed to write PID to lock file
    WriteFailed(io::Error),
}

impl std::fmt::Display for LockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockError::CreateFailed(e) => write!(f, "Failed to create lock file: {}", e),
            LockError::AlreadyLocked { pid, path } => match pid {
                Some(p) => write!(f, "Store already in use by process {} ({})", p, path.display()),
                None => write!(f, "Store already in use ({})", path.display()),
            },
            LockError::WriteFailed(e) => write!(f, "Failed to write PID to lock file: {}", e),
        }
    }
}

impl std::error::Error for LockError {}

impl From<LockError> for KVStoreError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::AlreadyLocked { .. } => KVStoreError::Locked {
                message: err.to_string(),
            },
            other => KVStoreError::IOError {
                message: other.to_string(),
            },
        }
    }
}

// =============================================================================
// DATABASE LOCK
// =============================================================================

/// Exclusive lock on a store directory.
///
/// Held for the life of the store handle, released on drop (RAII). A second
/// acquisition fails immediately, whether from this process or another.
///
/// # Example
///
/// ```ignore
/// let lock = DatabaseLock::acquire(Path::new("./tmp/blocks_node_1"))?;
/// // Lock is held until `lock` goes out of scope
/// ```
#[derive(Debug)]
pub struct DatabaseLock {
    /// The lock file handle (kept open to maintain lock)
    file: File,
    /// Path to the lock file
    path: PathBuf,
}

impl DatabaseLock {
    /// Lock file name
    pub const LOCK_FILE: &'static str = "LOCK";

    /// Acquire an exclusive lock on `dir`, creating the lock file if needed.
    ///
    /// # Errors
    ///
    /// Returns `LockError::AlreadyLocked` if another handle holds the lock.
    pub fn acquire(dir: &Path) -> Result<Self, LockError> {
        let path = dir.join(Self::LOCK_FILE);

        // No truncate: the current holder's PID must survive a failed attempt
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(LockError::CreateFailed)?;

        if file.try_lock_exclusive().is_err() {
            return Err(LockError::AlreadyLocked {
                pid: Self::read_existing_pid(&path),
                path,
            });
        }

        file.set_len(0).map_err(LockError::WriteFailed)?;
        writeln!(file, "{}", std::process::id()).map_err(LockError::WriteFailed)?;
        file.sync_all().map_err(LockError::WriteFailed)?;

        Ok(Self { file, path })
    }

    /// Get the path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read PID from existing lock file (for error messages)
    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for DatabaseLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
