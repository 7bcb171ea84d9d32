use std::cmp::Ordering;

use tracing::debug;

use folio_store::{DocumentStore, ReceiptRecord, TransactionRecord};

use crate::entry::LedgerEntry;
use crate::error::Result;
use crate::filter::LedgerFilter;

/// Read-only union of the transaction store and the receipt store.
///
/// Both stores are queried independently with equivalent filters and the
/// results are concatenated and re-sorted. A failure in either store fails
/// the whole read; partial ledgers are never returned.
pub struct MergedLedger<'a> {
    transactions: &'a dyn DocumentStore<TransactionRecord>,
    receipts: &'a dyn DocumentStore<ReceiptRecord>,
}

impl<'a> MergedLedger<'a> {
    pub fn new(
        transactions: &'a dyn DocumentStore<TransactionRecord>,
        receipts: &'a dyn DocumentStore<ReceiptRecord>,
    ) -> Self {
        Self {
            transactions,
            receipts,
        }
    }

    /// Matching entries, newest first.
    pub fn list(&self, filter: &LedgerFilter) -> Result<Vec<LedgerEntry>> {
        let transactions = self.transactions.query(&filter.transaction_query())?;
        let receipts = match filter.receipt_query() {
            Some(query) => self.receipts.query(&query)?,
            None => Vec::new(),
        };
        debug!(
            transactions = transactions.len(),
            receipts = receipts.len(),
            "merging ledger"
        );

        let mut entries: Vec<LedgerEntry> = transactions
            .into_iter()
            .map(LedgerEntry::from)
            .chain(receipts.into_iter().map(LedgerEntry::from))
            .collect();
        entries.sort_by(newest_first);
        Ok(entries)
    }
}

/// `(date desc, transaction_number desc)`.
pub fn newest_first(a: &LedgerEntry, b: &LedgerEntry) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.transaction_number.cmp(&a.transaction_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use folio_store::{
        InMemoryStore, NumberField, NumberSource, StoreError, StoreQuery, StoreResult,
    };
    use folio_types::{
        DocumentId, DocumentKind, PaymentMethod, ReceiptStatus, TransactionStatus,
    };
    use rust_decimal::Decimal;

    use crate::entry::EntrySource;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn transaction(kind: DocumentKind, txn: &str, voucher: &str, d: u32) -> TransactionRecord {
        TransactionRecord {
            id: DocumentId::new(),
            kind,
            transaction_number: txn.into(),
            voucher_number: voucher.into(),
            date: day(d),
            name: "Acme".into(),
            description: String::new(),
            account: None,
            bank: None,
            amount: Decimal::new(100, 0),
            payment_method: PaymentMethod::Cash,
            status: TransactionStatus::Draft,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            revision: 0,
        }
    }

    fn receipt(txn: &str, voucher: &str, d: u32) -> ReceiptRecord {
        ReceiptRecord {
            id: DocumentId::new(),
            transaction_number: txn.into(),
            voucher_number: voucher.into(),
            date: day(d),
            customer_name: "Globex".into(),
            description: String::new(),
            account: None,
            bank: None,
            amount: Decimal::new(40, 0),
            payment_method: PaymentMethod::Cheque,
            status: ReceiptStatus::Draft,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            revision: 0,
        }
    }

    fn seeded() -> (InMemoryStore<TransactionRecord>, InMemoryStore<ReceiptRecord>) {
        let transactions = InMemoryStore::new();
        transactions
            .insert(transaction(DocumentKind::Invoice, "TXN24060001", "I24060001", 1))
            .unwrap();
        transactions
            .insert(transaction(DocumentKind::Invoice, "TXN24060004", "I24060002", 4))
            .unwrap();

        let receipts = InMemoryStore::new();
        receipts.insert(receipt("TXN24060002", "RCP0001", 2)).unwrap();
        receipts.insert(receipt("TXN24060003", "RCP0002", 4)).unwrap();
        receipts.insert(receipt("TXN24060005", "RCP0003", 2)).unwrap();
        (transactions, receipts)
    }

    #[test]
    fn receipt_filter_returns_only_receipts_sorted() {
        let (transactions, receipts) = seeded();
        receipts.insert(receipt("TXN24060006", "RCP0004", 20)).unwrap();
        let ledger = MergedLedger::new(&transactions, &receipts);

        let filter = LedgerFilter::new()
            .with_kind(DocumentKind::Receipt)
            .with_date_range(Some(day(1)), Some(day(10)));
        let entries = ledger.list(&filter).unwrap();
        let numbers: Vec<&str> = entries
            .iter()
            .map(|e| e.transaction_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["TXN24060003", "TXN24060005", "TXN24060002"]);
        assert!(entries.iter().all(|e| e.source == EntrySource::Receipt));
    }

    #[test]
    fn unfiltered_list_merges_both_stores() {
        let (transactions, receipts) = seeded();
        let ledger = MergedLedger::new(&transactions, &receipts);

        let entries = ledger.list(&LedgerFilter::new()).unwrap();
        let numbers: Vec<&str> = entries
            .iter()
            .map(|e| e.transaction_number.as_str())
            .collect();
        assert_eq!(
            numbers,
            vec![
                "TXN24060004",
                "TXN24060003",
                "TXN24060005",
                "TXN24060002",
                "TXN24060001"
            ]
        );
    }

    #[test]
    fn invoice_filter_skips_receipt_store() {
        let (transactions, receipts) = seeded();
        let ledger = MergedLedger::new(&transactions, &receipts);
        let entries = ledger
            .list(&LedgerFilter::new().with_kind(DocumentKind::Invoice))
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.kind == DocumentKind::Invoice));
    }

    #[test]
    fn soft_deleted_transactions_are_hidden() {
        let (transactions, receipts) = seeded();
        let mut hidden = transaction(DocumentKind::Bill, "TXN24060009", "B24060001", 9);
        hidden.is_active = false;
        transactions.insert(hidden).unwrap();

        let entries = MergedLedger::new(&transactions, &receipts)
            .list(&LedgerFilter::new())
            .unwrap();
        assert!(entries.iter().all(|e| e.transaction_number != "TXN24060009"));
    }

    #[test]
    fn status_and_search_apply_to_both_stores() {
        let (transactions, receipts) = seeded();
        let ledger = MergedLedger::new(&transactions, &receipts);
        let globex = ledger
            .list(&LedgerFilter::new().with_search("GLOBEX"))
            .unwrap();
        assert_eq!(globex.len(), 3);

        let drafts = ledger
            .list(&LedgerFilter::new().with_status("draft"))
            .unwrap();
        assert_eq!(drafts.len(), 5);
    }

    /// A receipt store whose reads always fail.
    struct BrokenStore;

    impl NumberSource for BrokenStore {
        fn source_name(&self) -> &'static str {
            "receipt"
        }

        fn numbers_with_prefix(&self, _: NumberField, _: &str) -> StoreResult<Vec<String>> {
            Err(unavailable())
        }

        fn number_exists(&self, _: NumberField, _: &str) -> StoreResult<bool> {
            Err(unavailable())
        }
    }

    fn unavailable() -> StoreError {
        StoreError::Unavailable {
            store: "receipt",
            reason: "connection reset".into(),
        }
    }

    impl DocumentStore<ReceiptRecord> for BrokenStore {
        fn insert(&self, _: ReceiptRecord) -> StoreResult<ReceiptRecord> {
            Err(unavailable())
        }

        fn get(&self, _: &DocumentId) -> StoreResult<Option<ReceiptRecord>> {
            Err(unavailable())
        }

        fn update(&self, _: ReceiptRecord) -> StoreResult<ReceiptRecord> {
            Err(unavailable())
        }

        fn delete(&self, _: &DocumentId) -> StoreResult<bool> {
            Err(unavailable())
        }

        fn query(&self, _: &StoreQuery) -> StoreResult<Vec<ReceiptRecord>> {
            Err(unavailable())
        }

        fn count(&self) -> StoreResult<usize> {
            Err(unavailable())
        }

        fn as_number_source(&self) -> &dyn NumberSource {
            self
        }
    }

    #[test]
    fn failing_store_fails_the_whole_read() {
        let (transactions, _) = seeded();
        let ledger = MergedLedger::new(&transactions, &BrokenStore);
        assert!(ledger.list(&LedgerFilter::new()).is_err());
    }

    #[test]
    fn failing_store_not_consulted_when_filtered_out() {
        let (transactions, _) = seeded();
        let ledger = MergedLedger::new(&transactions, &BrokenStore);
        let entries = ledger
            .list(&LedgerFilter::new().with_kind(DocumentKind::Invoice))
            .unwrap();
        assert_eq!(entries.len(), 2);
    }
}
