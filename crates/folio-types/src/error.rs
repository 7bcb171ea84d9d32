use thiserror::Error;

/// Errors produced when parsing or validating foundation types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid document id: {0}")]
    InvalidId(String),

    #[error("unknown document kind: {0}")]
    UnknownKind(String),

    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),
}
