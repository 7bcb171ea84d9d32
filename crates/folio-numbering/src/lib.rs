//! Document numbering for Folio.
//!
//! Folio identifiers are human-readable and chronologically meaningful, so
//! they cannot come from a plain atomic counter. Instead the allocator:
//!
//! 1. scans every store sharing the identifier's namespace for the highest
//!    sequence already issued under the exact prefix,
//! 2. proposes `max + 1`, zero-padded,
//! 3. probes each candidate against every colliding store and moves to the
//!    next one while it is taken, up to a bounded number of attempts.
//!
//! This is optimistic concurrency: no lock is held across probes, and the
//! store's uniqueness constraint remains the final arbiter. Callers that lose
//! a race at write time re-run the whole allocation.
//!
//! # Modules
//!
//! - [`sequence`]: [`extract_sequence`] parses the numeric suffix of an identifier
//! - [`scheme`]: [`NumberScheme`] describes the four identifier formats
//! - [`allocator`]: [`NumberAllocator`] implements scan + probe
//! - [`config`]: [`AllocatorConfig`] attempt budget and sequence width

pub mod allocator;
pub mod config;
pub mod error;
pub mod scheme;
pub mod sequence;

pub use allocator::NumberAllocator;
pub use config::AllocatorConfig;
pub use error::{NumberingError, Result};
pub use scheme::{NumberScheme, PAYMENT_VOUCHER_PREFIX, RECEIPT_VOUCHER_PREFIX, TRANSACTION_PREFIX};
pub use sequence::extract_sequence;
