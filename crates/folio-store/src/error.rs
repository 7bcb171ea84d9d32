use folio_types::DocumentId;

use crate::query::NumberField;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document with this id exists in the store.
    #[error("document not found in {store} store: {id}")]
    NotFound { store: &'static str, id: DocumentId },

    /// A document with this id is already stored.
    #[error("document already exists in {store} store: {id}")]
    AlreadyExists { store: &'static str, id: DocumentId },

    /// The write was based on a stale revision of the document.
    #[error("stale write to {store} store for {id}: expected revision {expected}, found {actual}")]
    Conflict {
        store: &'static str,
        id: DocumentId,
        expected: u64,
        actual: u64,
    },

    /// The uniqueness constraint on a number field rejected the write.
    #[error("duplicate {field} in {store} store: {value}")]
    DuplicateKey {
        store: &'static str,
        field: NumberField,
        value: String,
    },

    /// A guard protecting store state was poisoned by a panicking writer.
    #[error("{store} store lock poisoned")]
    LockPoisoned { store: &'static str },

    /// The backend could not serve the request.
    #[error("{store} store unavailable: {reason}")]
    Unavailable { store: &'static str, reason: String },

    /// Another process holds the lock on a snapshot file.
    #[error("{} is locked by another folio process", .path.display())]
    FileLocked {
        path: std::path::PathBuf,
        holder: Option<u32>,
    },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` if this is a uniqueness-constraint rejection.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    /// Returns `true` if the write lost an optimistic revision check.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
