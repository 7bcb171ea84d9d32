//! Inter-process lock on a snapshot file.
//!
//! Every process that loads a snapshot, changes it and saves it back takes
//! an exclusive lock on a sidecar `<file>.lock` first and holds it until the
//! save is done. A second process fails fast with
//! [`StoreError::FileLocked`] instead of overwriting the first one's work.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// Exclusive lock on a snapshot file, released on drop.
#[derive(Debug)]
pub struct SnapshotLock {
    file: File,
    path: PathBuf,
}

impl SnapshotLock {
    /// Lock the snapshot at `data_file` without blocking.
    ///
    /// The snapshot itself need not exist yet.
    pub fn acquire(data_file: &Path) -> StoreResult<Self> {
        let path = lock_path(data_file);
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;

        if file.try_lock_exclusive().is_err() {
            let holder = read_holder(&path);
            return Err(StoreError::FileLocked { path, holder });
        }

        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        debug!(path = %path.display(), "snapshot lock acquired");
        Ok(Self { file, path })
    }

    /// Path of the sidecar lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        if let Err(err) = self.file.unlock() {
            warn!(path = %self.path.display(), error = %err, "snapshot unlock failed");
        }
    }
}

/// `books.json` -> `books.json.lock`.
pub fn lock_path(data_file: &Path) -> PathBuf {
    let mut name = OsString::from(data_file.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

fn read_holder(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
}
