//! Error types for numbering operations.

use thiserror::Error;

use folio_store::StoreError;

/// Errors that can occur while allocating an identifier.
#[derive(Debug, Error)]
pub enum NumberingError {
    /// Every candidate within the attempt budget was already taken.
    #[error("could not allocate a free number under prefix {prefix} after {attempts} attempts")]
    AllocationExhausted { prefix: String, attempts: u32 },

    /// A store could not be scanned or probed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience type alias for numbering operations.
pub type Result<T> = std::result::Result<T, NumberingError>;
