use folio_types::DocumentId;

use crate::error::StoreResult;
use crate::query::{NumberField, StoreQuery};
use crate::record::StoredDocument;

/// Read access to the identifiers a store has already handed out.
///
/// This is the only surface the numbering engine needs: a prefix scan to
/// find the highest sequence in use, and a point lookup to probe a
/// candidate. Every round-trip may block on I/O.
pub trait NumberSource: Send + Sync {
    /// Name of the backing store for logs and errors.
    fn source_name(&self) -> &'static str;

    /// All values of `field` that start with `prefix`.
    fn numbers_with_prefix(&self, field: NumberField, prefix: &str) -> StoreResult<Vec<String>>;

    /// Whether any document carries exactly `value` in `field`.
    fn number_exists(&self, field: NumberField, value: &str) -> StoreResult<bool>;
}

/// Storage backend for one record shape.
///
/// Implementations must be thread-safe and enforce uniqueness of every
/// populated [`NumberField`] atomically with the write that introduces it.
/// The allocator's own checks are an optimization; this constraint is the
/// source of truth.
pub trait DocumentStore<R: StoredDocument>: NumberSource {
    /// Insert a new record, stamping `created_at`, `updated_at` and
    /// revision `1`.
    ///
    /// Fails with `DuplicateKey` if any number field is already taken, and
    /// with `AlreadyExists` if the id is.
    fn insert(&self, record: R) -> StoreResult<R>;

    /// Read a record by id. Returns `Ok(None)` if it does not exist.
    fn get(&self, id: &DocumentId) -> StoreResult<Option<R>>;

    /// Replace an existing record, preserving `created_at` and refreshing
    /// `updated_at`.
    ///
    /// `record.revision()` must equal the stored revision; otherwise the
    /// write is rejected with `Conflict` and nothing changes.
    fn update(&self, record: R) -> StoreResult<R>;

    /// Permanently remove a record. Returns `true` if it existed.
    fn delete(&self, id: &DocumentId) -> StoreResult<bool>;

    /// Records admitted by `query`, newest first.
    fn query(&self, query: &StoreQuery) -> StoreResult<Vec<R>>;

    /// Number of stored records, including soft-deleted ones.
    fn count(&self) -> StoreResult<usize>;

    /// This store seen through its numbering surface.
    fn as_number_source(&self) -> &dyn NumberSource;
}

/// Sort records by `(date desc, own identifier desc)`.
pub fn sort_newest_first<R: StoredDocument>(records: &mut [R]) {
    records.sort_by(|a, b| {
        b.date()
            .cmp(&a.date())
            .then_with(|| b.sort_key().cmp(a.sort_key()))
    });
}

/// Sort records oldest first by creation time, for stable exports.
pub fn sort_by_creation<R: StoredDocument>(records: &mut [R]) {
    records.sort_by_key(|r| (r.created_at(), r.id()));
}
