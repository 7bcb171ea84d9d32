//! Document storage for Folio.
//!
//! Folio keeps financial documents in three independent stores:
//!
//! - the generic **transaction** store ([`TransactionRecord`]) holding
//!   receipts, payments, invoices and bills as one shape, soft-deleted via
//!   `is_active`
//! - the specialized **receipt** store ([`ReceiptRecord`]), hard-deleted
//! - the specialized **payment** store ([`PaymentRecord`]), hard-deleted
//!
//! All backends implement [`DocumentStore`], which is also a
//! [`NumberSource`] so the numbering engine can scan and probe identifiers
//! without knowing which store it talks to.
//!
//! # Design Rules
//!
//! 1. Every populated number field is unique within its store. The store
//!    enforces this atomically on insert and update and reports collisions as
//!    [`StoreError::DuplicateKey`]; it is the final arbiter for concurrent
//!    writers.
//! 2. `created_at`, `updated_at` and `revision` are maintained by the store
//!    on every write. Updates carrying a stale revision are rejected with
//!    [`StoreError::Conflict`].
//! 3. Queries return records sorted by `(date desc, own identifier desc)`.
//! 4. The store never interprets identifiers beyond prefix matching.

pub mod error;
pub mod lock;
pub mod memory;
pub mod query;
pub mod record;
pub mod snapshot;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use lock::{lock_path, SnapshotLock};
pub use memory::InMemoryStore;
pub use query::{DocumentView, NumberField, StoreQuery};
pub use record::{PaymentRecord, ReceiptRecord, StoredDocument, TransactionRecord};
pub use snapshot::{load_json, save_json};
pub use traits::{sort_by_creation, sort_newest_first, DocumentStore, NumberSource};
