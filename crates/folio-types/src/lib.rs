//! Foundation types for Folio.
//!
//! Folio is a small bookkeeping core: financial documents (receipts,
//! payments, invoices, bills) recorded against a chart of accounts, numbered
//! with human-readable identifiers and tracked through a posting lifecycle.
//! Every other Folio crate depends on `folio-types`.
//!
//! # Key Types
//!
//! - [`DocumentId`]: Opaque, time-ordered document handle (UUID v7)
//! - [`AccountRef`]: Opaque reference into the chart of accounts
//! - [`DocumentKind`]: Receipt, Payment, Invoice or Bill
//! - [`Period`]: Calendar year and month used to scope number sequences
//! - [`TransactionStatus`] / [`ReceiptStatus`]: Lifecycle states
//! - [`PaymentMethod`]: How money moved

pub mod error;
pub mod id;
pub mod kind;
pub mod method;
pub mod period;
pub mod status;

pub use error::TypeError;
pub use id::{AccountRef, DocumentId};
pub use kind::DocumentKind;
pub use method::PaymentMethod;
pub use period::Period;
pub use status::{ReceiptStatus, TransactionStatus};
