use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use folio_types::{
    AccountRef, DocumentId, DocumentKind, PaymentMethod, ReceiptStatus, TransactionStatus,
};

use crate::query::{DocumentView, NumberField, StoreQuery};

/// A record shape that can live in a [`DocumentStore`](crate::DocumentStore).
pub trait StoredDocument: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Name of the store this record type lives in, used in errors and logs.
    const STORE: &'static str;

    fn id(&self) -> DocumentId;

    fn date(&self) -> NaiveDate;

    /// Value of a uniquely constrained number field, if this shape has it.
    fn number(&self, field: NumberField) -> Option<&str>;

    /// The store-native identifier used as the secondary sort key.
    fn sort_key(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    /// Write counter, bumped by the store on every successful write.
    fn revision(&self) -> u64;

    /// Set write bookkeeping. Called by the store, never by callers.
    fn stamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>, revision: u64);

    fn view(&self) -> DocumentView<'_>;

    fn matches(&self, query: &StoreQuery) -> bool {
        query.admits(&self.view())
    }
}

/// A generic ledger document: receipt, payment, invoice or bill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: DocumentId,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub transaction_number: String,
    pub voucher_number: String,
    pub date: NaiveDate,
    /// Counterparty display name, denormalized at write time.
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub account: Option<AccountRef>,
    pub bank: Option<AccountRef>,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: TransactionStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub revision: u64,
}

/// A receipt in the specialized receipt store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRecord {
    pub id: DocumentId,
    pub transaction_number: String,
    pub voucher_number: String,
    pub date: NaiveDate,
    pub customer_name: String,
    #[serde(default)]
    pub description: String,
    pub account: Option<AccountRef>,
    pub bank: Option<AccountRef>,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: ReceiptStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub revision: u64,
}

/// A payment voucher in the specialized payment store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: DocumentId,
    pub voucher_number: String,
    pub date: NaiveDate,
    pub supplier_name: String,
    #[serde(default)]
    pub description: String,
    pub account: Option<AccountRef>,
    pub bank: Option<AccountRef>,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: ReceiptStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub revision: u64,
}

impl StoredDocument for TransactionRecord {
    const STORE: &'static str = "transaction";

    fn id(&self) -> DocumentId {
        self.id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn number(&self, field: NumberField) -> Option<&str> {
        match field {
            NumberField::TransactionNumber => Some(&self.transaction_number),
            NumberField::VoucherNumber => Some(&self.voucher_number),
        }
    }

    fn sort_key(&self) -> &str {
        &self.transaction_number
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn stamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>, revision: u64) {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self.revision = revision;
    }

    fn view(&self) -> DocumentView<'_> {
        DocumentView {
            kind: self.kind,
            status: self.status.as_str(),
            account: self.account.as_ref(),
            bank: self.bank.as_ref(),
            date: self.date,
            name: &self.name,
            description: &self.description,
            transaction_number: Some(&self.transaction_number),
            voucher_number: &self.voucher_number,
            is_active: self.is_active,
        }
    }
}

impl StoredDocument for ReceiptRecord {
    const STORE: &'static str = "receipt";

    fn id(&self) -> DocumentId {
        self.id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn number(&self, field: NumberField) -> Option<&str> {
        match field {
            NumberField::TransactionNumber => Some(&self.transaction_number),
            NumberField::VoucherNumber => Some(&self.voucher_number),
        }
    }

    fn sort_key(&self) -> &str {
        &self.voucher_number
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn stamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>, revision: u64) {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self.revision = revision;
    }

    fn view(&self) -> DocumentView<'_> {
        DocumentView {
            kind: DocumentKind::Receipt,
            status: self.status.as_str(),
            account: self.account.as_ref(),
            bank: self.bank.as_ref(),
            date: self.date,
            name: &self.customer_name,
            description: &self.description,
            transaction_number: Some(&self.transaction_number),
            voucher_number: &self.voucher_number,
            is_active: true,
        }
    }
}

impl StoredDocument for PaymentRecord {
    const STORE: &'static str = "payment";

    fn id(&self) -> DocumentId {
        self.id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn number(&self, field: NumberField) -> Option<&str> {
        match field {
            NumberField::TransactionNumber => None,
            NumberField::VoucherNumber => Some(&self.voucher_number),
        }
    }

    fn sort_key(&self) -> &str {
        &self.voucher_number
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn stamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>, revision: u64) {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self.revision = revision;
    }

    fn view(&self) -> DocumentView<'_> {
        DocumentView {
            kind: DocumentKind::Payment,
            status: self.status.as_str(),
            account: self.account.as_ref(),
            bank: self.bank.as_ref(),
            date: self.date,
            name: &self.supplier_name,
            description: &self.description,
            transaction_number: None,
            voucher_number: &self.voucher_number,
            is_active: true,
        }
    }
}
