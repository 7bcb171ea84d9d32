use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::debug;

use folio_types::DocumentId;

use crate::error::{StoreError, StoreResult};
use crate::query::{NumberField, StoreQuery};
use crate::record::StoredDocument;
use crate::traits::{sort_by_creation, sort_newest_first, DocumentStore, NumberSource};

/// In-memory, `HashMap`-based document store.
///
/// Intended for tests, the CLI and embedding. Records live behind a single
/// `RwLock` together with a unique index over every number field, so the
/// uniqueness check and the write that claims a number happen under the same
/// write guard.
pub struct InMemoryStore<R: StoredDocument> {
    inner: RwLock<StoreState<R>>,
}

struct StoreState<R> {
    documents: HashMap<DocumentId, R>,
    numbers: BTreeMap<(NumberField, String), DocumentId>,
}

impl<R> Default for StoreState<R> {
    fn default() -> Self {
        Self {
            documents: HashMap::new(),
            numbers: BTreeMap::new(),
        }
    }
}

impl<R: StoredDocument> InMemoryStore<R> {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
        }
    }

    /// Rebuild a store from previously exported records.
    ///
    /// Timestamps are kept as-is. Fails if the records violate the
    /// uniqueness constraints.
    pub fn from_records(records: Vec<R>) -> StoreResult<Self> {
        let mut state = StoreState::default();
        for record in records {
            let id = record.id();
            if state.documents.contains_key(&id) {
                return Err(StoreError::AlreadyExists { store: R::STORE, id });
            }
            check_numbers(&state, &record, None)?;
            index_numbers(&mut state, &record);
            state.documents.insert(id, record);
        }
        Ok(Self {
            inner: RwLock::new(state),
        })
    }

    /// All records, oldest first.
    pub fn export(&self) -> StoreResult<Vec<R>> {
        let state = self.read_state()?;
        let mut records: Vec<R> = state.documents.values().cloned().collect();
        sort_by_creation(&mut records);
        Ok(records)
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, StoreState<R>>> {
        self.inner
            .read()
            .map_err(|_| StoreError::LockPoisoned { store: R::STORE })
    }

    fn write_state(&self) -> StoreResult<RwLockWriteGuard<'_, StoreState<R>>> {
        self.inner
            .write()
            .map_err(|_| StoreError::LockPoisoned { store: R::STORE })
    }
}

impl<R: StoredDocument> Default for InMemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: StoredDocument> std::fmt::Debug for InMemoryStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.read_state().map(|s| s.documents.len()).ok();
        f.debug_struct("InMemoryStore")
            .field("store", &R::STORE)
            .field("document_count", &count)
            .finish()
    }
}

impl<R: StoredDocument> NumberSource for InMemoryStore<R> {
    fn source_name(&self) -> &'static str {
        R::STORE
    }

    fn numbers_with_prefix(&self, field: NumberField, prefix: &str) -> StoreResult<Vec<String>> {
        let state = self.read_state()?;
        Ok(state
            .numbers
            .range((field, prefix.to_string())..)
            .take_while(|((f, value), _)| *f == field && value.starts_with(prefix))
            .map(|((_, value), _)| value.clone())
            .collect())
    }

    fn number_exists(&self, field: NumberField, value: &str) -> StoreResult<bool> {
        let state = self.read_state()?;
        Ok(state.numbers.contains_key(&(field, value.to_string())))
    }
}

impl<R: StoredDocument> DocumentStore<R> for InMemoryStore<R> {
    fn insert(&self, mut record: R) -> StoreResult<R> {
        let mut state = self.write_state()?;
        let id = record.id();
        if state.documents.contains_key(&id) {
            return Err(StoreError::AlreadyExists { store: R::STORE, id });
        }
        check_numbers(&state, &record, None)?;

        let now = Utc::now();
        record.stamp(now, now, 1);
        index_numbers(&mut state, &record);
        state.documents.insert(id, record.clone());
        debug!(store = R::STORE, id = %id, "document inserted");
        Ok(record)
    }

    fn get(&self, id: &DocumentId) -> StoreResult<Option<R>> {
        let state = self.read_state()?;
        Ok(state.documents.get(id).cloned())
    }

    fn update(&self, mut record: R) -> StoreResult<R> {
        let mut state = self.write_state()?;
        let id = record.id();
        let existing = state
            .documents
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { store: R::STORE, id })?;
        if record.revision() != existing.revision() {
            return Err(StoreError::Conflict {
                store: R::STORE,
                id,
                expected: record.revision(),
                actual: existing.revision(),
            });
        }
        check_numbers(&state, &record, Some(id))?;

        unindex_numbers(&mut state, &existing);
        record.stamp(existing.created_at(), Utc::now(), existing.revision() + 1);
        index_numbers(&mut state, &record);
        state.documents.insert(id, record.clone());
        debug!(store = R::STORE, id = %id, "document updated");
        Ok(record)
    }

    fn delete(&self, id: &DocumentId) -> StoreResult<bool> {
        let mut state = self.write_state()?;
        let Some(existing) = state.documents.remove(id) else {
            return Ok(false);
        };
        unindex_numbers(&mut state, &existing);
        debug!(store = R::STORE, id = %id, "document deleted");
        Ok(true)
    }

    fn query(&self, query: &StoreQuery) -> StoreResult<Vec<R>> {
        let state = self.read_state()?;
        let mut records: Vec<R> = state
            .documents
            .values()
            .filter(|record| record.matches(query))
            .cloned()
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.read_state()?.documents.len())
    }

    fn as_number_source(&self) -> &dyn NumberSource {
        self
    }
}

/// Reject the record if any of its numbers belongs to a different document.
fn check_numbers<R: StoredDocument>(
    state: &StoreState<R>,
    record: &R,
    owner: Option<DocumentId>,
) -> StoreResult<()> {
    for field in NumberField::ALL {
        let Some(value) = record.number(field) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        if let Some(holder) = state.numbers.get(&(field, value.to_string())) {
            if Some(*holder) != owner {
                return Err(StoreError::DuplicateKey {
                    store: R::STORE,
                    field,
                    value: value.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn index_numbers<R: StoredDocument>(state: &mut StoreState<R>, record: &R) {
    for field in NumberField::ALL {
        if let Some(value) = record.number(field) {
            if !value.is_empty() {
                state.numbers.insert((field, value.to_string()), record.id());
            }
        }
    }
}

fn unindex_numbers<R: StoredDocument>(state: &mut StoreState<R>, record: &R) {
    for field in NumberField::ALL {
        if let Some(value) = record.number(field) {
            state.numbers.remove(&(field, value.to_string()));
        }
    }
}
