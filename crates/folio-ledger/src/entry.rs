use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_store::{PaymentRecord, ReceiptRecord, StoredDocument, TransactionRecord};
use folio_types::{AccountRef, DocumentId, DocumentKind, PaymentMethod};

/// Which store a ledger entry was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    Transaction,
    Receipt,
}

/// One row of the merged ledger, normalized to the transaction shape.
///
/// Receipts are projected with their customer as `name` and are always
/// active, since the receipt store hard-deletes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: DocumentId,
    pub source: EntrySource,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub transaction_number: String,
    pub voucher_number: String,
    pub date: NaiveDate,
    pub name: String,
    pub description: String,
    pub account: Option<AccountRef>,
    pub bank: Option<AccountRef>,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TransactionRecord> for LedgerEntry {
    fn from(t: TransactionRecord) -> Self {
        Self {
            id: t.id,
            source: EntrySource::Transaction,
            kind: t.kind,
            transaction_number: t.transaction_number,
            voucher_number: t.voucher_number,
            date: t.date,
            name: t.name,
            description: t.description,
            account: t.account,
            bank: t.bank,
            amount: t.amount,
            payment_method: t.payment_method,
            status: t.status.to_string(),
            is_active: t.is_active,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

impl From<ReceiptRecord> for LedgerEntry {
    fn from(r: ReceiptRecord) -> Self {
        Self {
            id: r.id,
            source: EntrySource::Receipt,
            kind: DocumentKind::Receipt,
            transaction_number: r.transaction_number,
            voucher_number: r.voucher_number,
            date: r.date,
            name: r.customer_name,
            description: r.description,
            account: r.account,
            bank: r.bank,
            amount: r.amount,
            payment_method: r.payment_method,
            status: r.status.to_string(),
            is_active: true,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// A document from any of the three stores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "store", rename_all = "lowercase")]
pub enum Document {
    Transaction(TransactionRecord),
    Receipt(ReceiptRecord),
    Payment(PaymentRecord),
}

impl Document {
    pub fn id(&self) -> DocumentId {
        match self {
            Self::Transaction(t) => t.id,
            Self::Receipt(r) => r.id,
            Self::Payment(p) => p.id,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Transaction(t) => t.kind,
            Self::Receipt(_) => DocumentKind::Receipt,
            Self::Payment(_) => DocumentKind::Payment,
        }
    }

    /// Name of the store the document lives in.
    pub fn store(&self) -> &'static str {
        match self {
            Self::Transaction(_) => TransactionRecord::STORE,
            Self::Receipt(_) => ReceiptRecord::STORE,
            Self::Payment(_) => PaymentRecord::STORE,
        }
    }

    pub fn status(&self) -> String {
        match self {
            Self::Transaction(t) => t.status.to_string(),
            Self::Receipt(r) => r.status.to_string(),
            Self::Payment(p) => p.status.to_string(),
        }
    }

    /// The voucher number, which every document has.
    pub fn voucher_number(&self) -> &str {
        match self {
            Self::Transaction(t) => &t.voucher_number,
            Self::Receipt(r) => &r.voucher_number,
            Self::Payment(p) => &p.voucher_number,
        }
    }

    /// The transaction number; payment vouchers have none.
    pub fn transaction_number(&self) -> Option<&str> {
        match self {
            Self::Transaction(t) => Some(&t.transaction_number),
            Self::Receipt(r) => Some(&r.transaction_number),
            Self::Payment(_) => None,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Self::Transaction(t) => t.amount,
            Self::Receipt(r) => r.amount,
            Self::Payment(p) => p.amount,
        }
    }
}
