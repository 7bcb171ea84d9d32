//! Atomic JSON snapshot files.
//!
//! Snapshots are written to a temporary file in the destination directory
//! and then renamed over the target, so a crash mid-write never leaves a
//! truncated file behind.

use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Serialize `value` as pretty JSON and atomically replace `path`.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let encoded =
        serde_json::to_vec_pretty(value).map_err(|e| StoreError::Serialization(e.to_string()))?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(&encoded)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    debug!(path = %path.display(), bytes = encoded.len(), "snapshot saved");
    Ok(())
}

/// Read and deserialize a JSON snapshot.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}
