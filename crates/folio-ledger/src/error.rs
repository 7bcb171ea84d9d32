use folio_numbering::NumberingError;
use folio_store::StoreError;
use folio_types::{DocumentId, TypeError};

use crate::lifecycle::LifecycleAction;

/// Errors produced by bookkeeping operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Every candidate number under `prefix` was taken.
    #[error("no free number under {prefix} after {attempts} attempts")]
    AllocationExhausted { prefix: String, attempts: u32 },

    /// Concurrent writers kept winning the race for the same document or
    /// number; the write was abandoned after `attempts` tries.
    #[error("write to {store} store kept conflicting after {attempts} attempts")]
    WriteConflict { store: &'static str, attempts: u32 },

    #[error("cannot {action} document {id} in status {from}")]
    InvalidTransition {
        id: DocumentId,
        from: String,
        action: LifecycleAction,
    },

    #[error("cannot move document {id} from {from} to {to}")]
    InvalidStatusChange {
        id: DocumentId,
        from: String,
        to: String,
    },

    /// The document is in a terminal status and no longer editable.
    #[error("document {id} is {status} and can no longer be edited")]
    Locked { id: DocumentId, status: String },

    #[error("document not found: {0}")]
    NotFound(DocumentId),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Returns `true` if the caller asked for something that can never
    /// succeed as given.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. }
                | Self::InvalidStatusChange { .. }
                | Self::Locked { .. }
                | Self::NotFound(_)
                | Self::Validation(_)
        )
    }

    /// Returns `true` if repeating the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::AllocationExhausted { .. } | Self::WriteConflict { .. }
        )
    }
}

impl From<NumberingError> for LedgerError {
    fn from(err: NumberingError) -> Self {
        match err {
            NumberingError::AllocationExhausted { prefix, attempts } => {
                Self::AllocationExhausted { prefix, attempts }
            }
            NumberingError::Store(err) => Self::Store(err),
        }
    }
}

impl From<TypeError> for LedgerError {
    fn from(err: TypeError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
