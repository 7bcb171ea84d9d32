use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use folio_numbering::{NumberAllocator, NumberScheme};
use folio_store::{
    sort_by_creation, DocumentStore, InMemoryStore, NumberField, NumberSource, PaymentRecord,
    ReceiptRecord, StoreQuery, StoredDocument, TransactionRecord,
};
use folio_types::{DocumentId, DocumentKind, Period, ReceiptStatus, TransactionStatus};

use crate::config::BooksConfig;
use crate::draft::{
    require_name, require_voucher_method, DocumentPatch, NewPayment, NewReceipt, NewTransaction,
};
use crate::entry::{Document, LedgerEntry};
use crate::error::{LedgerError, Result};
use crate::filter::LedgerFilter;
use crate::lifecycle::{Lifecycle, LifecycleAction};
use crate::merge::MergedLedger;
use crate::summary::LedgerSummary;

/// Copy the patched business fields onto a record whose counterparty field
/// is named `$name`.
macro_rules! apply_common {
    ($record:ident, $patch:ident, $name:ident) => {{
        if let Some(date) = $patch.date {
            $record.date = date;
        }
        if let Some(name) = &$patch.name {
            $record.$name = name.clone();
        }
        if let Some(description) = &$patch.description {
            $record.description = description.clone();
        }
        if let Some(account) = &$patch.account {
            $record.account = Some(account.clone());
        }
        if let Some(bank) = &$patch.bank {
            $record.bank = Some(bank.clone());
        }
        if let Some(amount) = $patch.amount {
            $record.amount = amount;
        }
        if let Some(method) = $patch.payment_method {
            $record.payment_method = method;
        }
    }};
}

/// Every record of every store, in creation order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooksSnapshot {
    pub transactions: Vec<TransactionRecord>,
    pub receipts: Vec<ReceiptRecord>,
    pub payments: Vec<PaymentRecord>,
}

/// How a delete was carried out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deletion {
    /// Flagged inactive; the record and its numbers are kept.
    Deactivated,
    /// Removed from its store.
    Removed,
}

/// The bookkeeping service: numbering, document writes, lifecycle and the
/// merged ledger over the three document stores.
///
/// `Books` is `Send + Sync` and holds no locks of its own. Concurrent
/// writers are reconciled by the stores' unique constraints and revision
/// checks; losing writers re-run allocation or re-apply their change.
pub struct Books {
    transactions: Arc<dyn DocumentStore<TransactionRecord>>,
    receipts: Arc<dyn DocumentStore<ReceiptRecord>>,
    payments: Arc<dyn DocumentStore<PaymentRecord>>,
    allocator: NumberAllocator,
    config: BooksConfig,
}

impl Books {
    pub fn new(
        transactions: Arc<dyn DocumentStore<TransactionRecord>>,
        receipts: Arc<dyn DocumentStore<ReceiptRecord>>,
        payments: Arc<dyn DocumentStore<PaymentRecord>>,
        config: BooksConfig,
    ) -> Self {
        Self {
            transactions,
            receipts,
            payments,
            allocator: NumberAllocator::new(config.allocator.clone()),
            config,
        }
    }

    /// Books over three empty in-memory stores.
    pub fn in_memory(config: BooksConfig) -> Self {
        Self::new(
            Arc::new(InMemoryStore::<TransactionRecord>::new()),
            Arc::new(InMemoryStore::<ReceiptRecord>::new()),
            Arc::new(InMemoryStore::<PaymentRecord>::new()),
            config,
        )
    }

    /// Books over in-memory stores rebuilt from `snapshot`.
    pub fn from_snapshot(snapshot: BooksSnapshot, config: BooksConfig) -> Result<Self> {
        Ok(Self::new(
            Arc::new(InMemoryStore::from_records(snapshot.transactions)?),
            Arc::new(InMemoryStore::from_records(snapshot.receipts)?),
            Arc::new(InMemoryStore::from_records(snapshot.payments)?),
            config,
        ))
    }

    /// Export every record, including soft-deleted transactions.
    pub fn snapshot(&self) -> Result<BooksSnapshot> {
        let everything = StoreQuery::default();
        let mut transactions = self.transactions.query(&everything)?;
        let mut receipts = self.receipts.query(&everything)?;
        let mut payments = self.payments.query(&everything)?;
        sort_by_creation(&mut transactions);
        sort_by_creation(&mut receipts);
        sort_by_creation(&mut payments);
        Ok(BooksSnapshot {
            transactions,
            receipts,
            payments,
        })
    }

    pub fn config(&self) -> &BooksConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Numbering
    // ---------------------------------------------------------------

    /// Next `TXN{YYMM}{seq}` for `period`. The sequence is shared by the
    /// transaction and receipt stores.
    pub fn allocate_transaction_number(&self, period: Period) -> Result<String> {
        let scheme = NumberScheme::Transaction { period };
        Ok(self.allocator.allocate(
            &scheme,
            &[
                self.transactions.as_number_source(),
                self.receipts.as_number_source(),
            ],
        )?)
    }

    /// Next `{letter}{YYMM}{seq}` voucher for a transaction-store document.
    pub fn allocate_voucher_number(&self, kind: DocumentKind, period: Period) -> Result<String> {
        let scheme = NumberScheme::TransactionVoucher { kind, period };
        Ok(self
            .allocator
            .allocate(&scheme, &[self.transactions.as_number_source()])?)
    }

    /// Next `RCP{seq}` voucher for the receipt store.
    pub fn allocate_receipt_voucher_number(&self) -> Result<String> {
        Ok(self.allocator.allocate(
            &NumberScheme::ReceiptVoucher,
            &[self.receipts.as_number_source()],
        )?)
    }

    /// Next `PV{seq}` voucher for the payment store.
    pub fn allocate_payment_voucher_number(&self) -> Result<String> {
        Ok(self.allocator.allocate(
            &NumberScheme::PaymentVoucher,
            &[self.payments.as_number_source()],
        )?)
    }

    // ---------------------------------------------------------------
    // Creation
    // ---------------------------------------------------------------

    /// Create a draft in the transaction store, numbered within `period`.
    pub fn create_transaction(
        &self,
        draft: NewTransaction,
        period: Period,
    ) -> Result<TransactionRecord> {
        draft.validate()?;
        let stored = self.insert_numbered(
            &*self.transactions,
            Some(self.receipts.as_number_source()),
            || {
                let now = Utc::now();
                Ok(TransactionRecord {
                    id: DocumentId::new(),
                    kind: draft.kind,
                    transaction_number: self.allocate_transaction_number(period)?,
                    voucher_number: self.allocate_voucher_number(draft.kind, period)?,
                    date: draft.date,
                    name: draft.name.clone(),
                    description: draft.description.clone(),
                    account: draft.account.clone(),
                    bank: draft.bank.clone(),
                    amount: draft.amount,
                    payment_method: draft.payment_method,
                    status: TransactionStatus::Draft,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                    revision: 0,
                })
            },
        )?;
        info!(
            id = %stored.id,
            kind = %stored.kind,
            transaction_number = %stored.transaction_number,
            voucher_number = %stored.voucher_number,
            "transaction created"
        );
        Ok(stored)
    }

    /// Create a draft in the receipt store. Its transaction number is drawn
    /// from `period`'s shared sequence.
    pub fn create_receipt(&self, draft: NewReceipt, period: Period) -> Result<ReceiptRecord> {
        draft.validate()?;
        let stored = self.insert_numbered(
            &*self.receipts,
            Some(self.transactions.as_number_source()),
            || {
                let now = Utc::now();
                Ok(ReceiptRecord {
                    id: DocumentId::new(),
                    transaction_number: self.allocate_transaction_number(period)?,
                    voucher_number: self.allocate_receipt_voucher_number()?,
                    date: draft.date,
                    customer_name: draft.customer_name.clone(),
                    description: draft.description.clone(),
                    account: draft.account.clone(),
                    bank: draft.bank.clone(),
                    amount: draft.amount,
                    payment_method: draft.payment_method,
                    status: ReceiptStatus::Draft,
                    created_at: now,
                    updated_at: now,
                    revision: 0,
                })
            },
        )?;
        info!(
            id = %stored.id,
            transaction_number = %stored.transaction_number,
            voucher_number = %stored.voucher_number,
            "receipt created"
        );
        Ok(stored)
    }

    /// Create a draft payment voucher.
    pub fn create_payment(&self, draft: NewPayment) -> Result<PaymentRecord> {
        draft.validate()?;
        let stored = self.insert_numbered(&*self.payments, None, || {
            let now = Utc::now();
            Ok(PaymentRecord {
                id: DocumentId::new(),
                voucher_number: self.allocate_payment_voucher_number()?,
                date: draft.date,
                supplier_name: draft.supplier_name.clone(),
                description: draft.description.clone(),
                account: draft.account.clone(),
                bank: draft.bank.clone(),
                amount: draft.amount,
                payment_method: draft.payment_method,
                status: ReceiptStatus::Draft,
                created_at: now,
                updated_at: now,
                revision: 0,
            })
        })?;
        info!(id = %stored.id, voucher_number = %stored.voucher_number, "payment created");
        Ok(stored)
    }

    /// Build a freshly numbered record and insert it, re-running the build
    /// whenever a concurrent writer claimed one of its numbers first.
    ///
    /// `shared` is the other store that draws from the same transaction
    /// number sequence. Its unique index cannot see this store, so after a
    /// successful insert the number is checked there too; if it turns up,
    /// the insert is rolled back and the attempt counts as lost.
    fn insert_numbered<R: StoredDocument>(
        &self,
        store: &dyn DocumentStore<R>,
        shared: Option<&dyn NumberSource>,
        mut build: impl FnMut() -> Result<R>,
    ) -> Result<R> {
        let attempts = self.config.max_create_retries.saturating_add(1);
        for attempt in 1..=attempts {
            let record = build()?;
            let stored = match store.insert(record) {
                Ok(stored) => stored,
                Err(err) if err.is_duplicate_key() => {
                    warn!(
                        store = R::STORE,
                        attempt,
                        error = %err,
                        "number claimed concurrently, retrying"
                    );
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let transaction_number = stored.number(NumberField::TransactionNumber);
            let collided = match (shared, transaction_number) {
                (Some(other), Some(number)) => {
                    match other.number_exists(NumberField::TransactionNumber, number) {
                        Ok(found) => found,
                        Err(err) => {
                            // Unconfirmed: the number may already be taken there.
                            roll_back(store, &stored);
                            return Err(err.into());
                        }
                    }
                }
                _ => false,
            };
            if !collided {
                return Ok(stored);
            }

            warn!(
                store = R::STORE,
                other = shared.map(|s| s.source_name()).unwrap_or_default(),
                transaction_number = transaction_number.unwrap_or_default(),
                attempt,
                "transaction number claimed in the shared sequence, rolling back"
            );
            store.delete(&stored.id())?;
        }
        Err(LedgerError::WriteConflict {
            store: R::STORE,
            attempts,
        })
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    /// Look a document up by id in every store. Soft-deleted transactions
    /// are still returned.
    pub fn get(&self, id: &DocumentId) -> Result<Document> {
        if let Some(t) = self.transactions.get(id)? {
            return Ok(Document::Transaction(t));
        }
        if let Some(r) = self.receipts.get(id)? {
            return Ok(Document::Receipt(r));
        }
        if let Some(p) = self.payments.get(id)? {
            return Ok(Document::Payment(p));
        }
        Err(LedgerError::NotFound(*id))
    }

    /// The merged transaction + receipt ledger, newest first.
    pub fn list_ledger(&self, filter: &LedgerFilter) -> Result<Vec<LedgerEntry>> {
        MergedLedger::new(&*self.transactions, &*self.receipts).list(filter)
    }

    /// Payment vouchers matching `filter`, newest first. Payments are not
    /// part of the merged ledger.
    pub fn list_payments(&self, filter: &LedgerFilter) -> Result<Vec<PaymentRecord>> {
        match filter.payment_query() {
            Some(query) => Ok(self.payments.query(&query)?),
            None => Ok(Vec::new()),
        }
    }

    /// Totals over the merged ledger.
    pub fn summarize(&self, filter: &LedgerFilter) -> Result<LedgerSummary> {
        Ok(LedgerSummary::from_entries(&self.list_ledger(filter)?))
    }

    // ---------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------

    /// Apply a lifecycle action to the document with `id`, whichever store
    /// holds it.
    pub fn transition(&self, id: &DocumentId, action: LifecycleAction) -> Result<Document> {
        let document = match self.get(id)? {
            Document::Transaction(_) => Document::Transaction(self.modify(
                &*self.transactions,
                id,
                |t| advance(id, &mut t.status, action),
            )?),
            Document::Receipt(_) => Document::Receipt(self.modify(&*self.receipts, id, |r| {
                advance(id, &mut r.status, action)
            })?),
            Document::Payment(_) => Document::Payment(self.modify(&*self.payments, id, |p| {
                advance(id, &mut p.status, action)
            })?),
        };
        info!(id = %id, %action, status = %document.status(), "document transitioned");
        Ok(document)
    }

    /// Assign a receipt's status directly. Only moves the lifecycle allows
    /// are accepted.
    pub fn set_receipt_status(
        &self,
        id: &DocumentId,
        status: ReceiptStatus,
    ) -> Result<ReceiptRecord> {
        let stored = self.modify(&*self.receipts, id, |r| assign(id, &mut r.status, status))?;
        info!(id = %id, %status, "receipt status set");
        Ok(stored)
    }

    /// Assign a payment voucher's status directly. Only moves the lifecycle
    /// allows are accepted.
    pub fn set_payment_status(
        &self,
        id: &DocumentId,
        status: ReceiptStatus,
    ) -> Result<PaymentRecord> {
        let stored = self.modify(&*self.payments, id, |p| assign(id, &mut p.status, status))?;
        info!(id = %id, %status, "payment status set");
        Ok(stored)
    }

    /// Assign a status by label to the document with `id`, whichever store
    /// holds it.
    pub fn set_status(&self, id: &DocumentId, status: &str) -> Result<Document> {
        match self.get(id)? {
            Document::Transaction(_) => {
                let target: TransactionStatus = status.parse()?;
                let stored =
                    self.modify(&*self.transactions, id, |t| assign(id, &mut t.status, target))?;
                info!(id = %id, status = %target, "transaction status set");
                Ok(Document::Transaction(stored))
            }
            Document::Receipt(_) => Ok(Document::Receipt(
                self.set_receipt_status(id, status.parse()?)?,
            )),
            Document::Payment(_) => Ok(Document::Payment(
                self.set_payment_status(id, status.parse()?)?,
            )),
        }
    }

    // ---------------------------------------------------------------
    // Edits and deletes
    // ---------------------------------------------------------------

    /// Edit the business fields of a document. Identifiers, status and
    /// timestamps are never touched; documents in a terminal status are
    /// locked.
    pub fn update(&self, id: &DocumentId, patch: &DocumentPatch) -> Result<Document> {
        let document = match self.get(id)? {
            Document::Transaction(_) => Document::Transaction(self.update_transaction(id, patch)?),
            Document::Receipt(_) => Document::Receipt(self.modify(&*self.receipts, id, |r| {
                ensure_editable(id, r.status)?;
                patch_voucher_fields(patch)?;
                apply_common!(r, patch, customer_name);
                Ok(())
            })?),
            Document::Payment(_) => Document::Payment(self.modify(&*self.payments, id, |p| {
                ensure_editable(id, p.status)?;
                patch_voucher_fields(patch)?;
                apply_common!(p, patch, supplier_name);
                Ok(())
            })?),
        };
        info!(id = %id, store = document.store(), "document updated");
        Ok(document)
    }

    /// Edit a transaction-store document. Rejected once it is `Void`.
    pub fn update_transaction(
        &self,
        id: &DocumentId,
        patch: &DocumentPatch,
    ) -> Result<TransactionRecord> {
        if let Some(name) = &patch.name {
            require_name("name", name)?;
        }
        self.modify(&*self.transactions, id, |t| {
            ensure_editable(id, t.status)?;
            apply_common!(t, patch, name);
            Ok(())
        })
    }

    /// Delete a document the way its store requires: transactions are
    /// flagged inactive, receipts and payments are removed.
    pub fn delete(&self, id: &DocumentId) -> Result<Deletion> {
        match self.get(id)? {
            Document::Transaction(_) => self.soft_delete_transaction(id),
            Document::Receipt(_) => self.delete_receipt(id),
            Document::Payment(_) => self.delete_payment(id),
        }
    }

    /// Hide a transaction from ledger listings. It stays retrievable by id
    /// and keeps its numbers.
    pub fn soft_delete_transaction(&self, id: &DocumentId) -> Result<Deletion> {
        self.modify(&*self.transactions, id, |t| {
            t.is_active = false;
            Ok(())
        })?;
        info!(id = %id, "transaction deactivated");
        Ok(Deletion::Deactivated)
    }

    pub fn delete_receipt(&self, id: &DocumentId) -> Result<Deletion> {
        if !self.receipts.delete(id)? {
            return Err(LedgerError::NotFound(*id));
        }
        info!(id = %id, "receipt deleted");
        Ok(Deletion::Removed)
    }

    pub fn delete_payment(&self, id: &DocumentId) -> Result<Deletion> {
        if !self.payments.delete(id)? {
            return Err(LedgerError::NotFound(*id));
        }
        info!(id = %id, "payment deleted");
        Ok(Deletion::Removed)
    }

    /// Read-modify-write against a single store, re-reading and re-applying
    /// `change` when a concurrent writer bumped the revision in between.
    fn modify<R: StoredDocument>(
        &self,
        store: &dyn DocumentStore<R>,
        id: &DocumentId,
        mut change: impl FnMut(&mut R) -> Result<()>,
    ) -> Result<R> {
        let attempts = self.config.max_update_retries.saturating_add(1);
        for attempt in 1..=attempts {
            let mut record = store.get(id)?.ok_or(LedgerError::NotFound(*id))?;
            change(&mut record)?;
            match store.update(record) {
                Ok(stored) => return Ok(stored),
                Err(err) if err.is_conflict() => {
                    debug!(store = R::STORE, id = %id, attempt, "concurrent write, re-applying");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(LedgerError::WriteConflict {
            store: R::STORE,
            attempts,
        })
    }
}

/// Remove a record whose insert could not be confirmed. A failure here is
/// logged; the caller reports the error that triggered the rollback.
fn roll_back<R: StoredDocument>(store: &dyn DocumentStore<R>, record: &R) {
    if let Err(err) = store.delete(&record.id()) {
        error!(
            store = R::STORE,
            id = %record.id(),
            error = %err,
            "rollback of unconfirmed insert failed"
        );
    }
}

fn advance<S: Lifecycle>(id: &DocumentId, status: &mut S, action: LifecycleAction) -> Result<()> {
    let next = status
        .apply(action)
        .ok_or_else(|| LedgerError::InvalidTransition {
            id: *id,
            from: status.to_string(),
            action,
        })?;
    *status = next;
    Ok(())
}

fn assign<S: Lifecycle>(id: &DocumentId, status: &mut S, target: S) -> Result<()> {
    if !status.can_become(target) {
        return Err(LedgerError::InvalidStatusChange {
            id: *id,
            from: status.to_string(),
            to: target.to_string(),
        });
    }
    *status = target;
    Ok(())
}

fn ensure_editable<S: Lifecycle>(id: &DocumentId, status: S) -> Result<()> {
    if status.is_terminal() {
        return Err(LedgerError::Locked {
            id: *id,
            status: status.to_string(),
        });
    }
    Ok(())
}

fn patch_voucher_fields(patch: &DocumentPatch) -> Result<()> {
    if let Some(name) = &patch.name {
        require_name("name", name)?;
    }
    if let Some(method) = patch.payment_method {
        require_voucher_method(method)?;
    }
    Ok(())
}
