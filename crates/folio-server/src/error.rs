use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use folio_ledger::LedgerError;
use folio_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Ledger(#[from] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Ledger(err) => ledger_status(err),
            Self::Store(err) => store_status(err),
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Ledger(err) => match err {
                LedgerError::AllocationExhausted { .. } => "allocation_exhausted",
                LedgerError::WriteConflict { .. } => "write_conflict",
                LedgerError::InvalidTransition { .. } => "invalid_transition",
                LedgerError::InvalidStatusChange { .. } => "invalid_status_change",
                LedgerError::Locked { .. } => "locked",
                LedgerError::NotFound(_) => "not_found",
                LedgerError::Validation(_) => "validation",
                LedgerError::Store(_) => "store",
            },
            Self::Store(_) => "store",
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => "internal",
        }
    }
}

fn ledger_status(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::InvalidTransition { .. }
        | LedgerError::InvalidStatusChange { .. }
        | LedgerError::Locked { .. } => StatusCode::CONFLICT,
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
        LedgerError::AllocationExhausted { .. } | LedgerError::WriteConflict { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        LedgerError::Store(err) => store_status(err),
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use folio_ledger::LifecycleAction;
    use folio_types::DocumentId;

    #[test]
    fn ledger_errors_map_to_http_statuses() {
        let id = DocumentId::new();
        let cases = [
            (
                LedgerError::InvalidTransition {
                    id,
                    from: "Void".into(),
                    action: LifecycleAction::Post,
                },
                StatusCode::CONFLICT,
            ),
            (LedgerError::NotFound(id), StatusCode::NOT_FOUND),
            (LedgerError::Validation("blank".into()), StatusCode::BAD_REQUEST),
            (
                LedgerError::AllocationExhausted {
                    prefix: "RCP".into(),
                    attempts: 1000,
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                LedgerError::Store(StoreError::LockPoisoned { store: "receipt" }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ServerError::from(err).status(), expected);
        }
    }

    #[test]
    fn bad_request_status() {
        assert_eq!(
            ServerError::BadRequest("limit".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
