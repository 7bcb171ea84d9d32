//! Bookkeeping core for Folio.
//!
//! This crate ties the stores and the numbering engine together. It provides:
//! - Document lifecycles as the [`Lifecycle`] trait over both status enums
//! - [`MergedLedger`], the read-only union of the transaction and receipt
//!   stores, with [`LedgerFilter`] and the normalized [`LedgerEntry`]
//! - [`LedgerSummary`] totals per kind and status
//! - [`Books`], the service that numbers, creates, transitions, edits and
//!   deletes documents across the three stores
//!
//! # Concurrency
//!
//! `Books` never takes a lock of its own. Number allocation is optimistic:
//! a candidate is computed from the current maximum, written under the
//! store's unique constraint, and the whole allocation is re-run when a
//! concurrent writer got there first. Status changes and edits are
//! compare-and-set on the record revision.

pub mod books;
pub mod config;
pub mod draft;
pub mod entry;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod merge;
pub mod summary;

pub use books::{Books, BooksSnapshot, Deletion};
pub use config::BooksConfig;
pub use draft::{DocumentPatch, NewPayment, NewReceipt, NewTransaction};
pub use entry::{Document, EntrySource, LedgerEntry};
pub use error::{LedgerError, Result};
pub use filter::LedgerFilter;
pub use lifecycle::{Lifecycle, LifecycleAction};
pub use merge::MergedLedger;
pub use summary::{LedgerSummary, Totals};
