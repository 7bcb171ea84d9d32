use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use folio_types::{AccountRef, DocumentKind};

/// An identifier field that carries a store-level uniqueness constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumberField {
    /// Cross-kind, period-scoped `TXN` number.
    TransactionNumber,
    /// Kind-specific human-facing voucher number.
    VoucherNumber,
}

impl NumberField {
    pub const ALL: [NumberField; 2] = [Self::TransactionNumber, Self::VoucherNumber];
}

impl fmt::Display for NumberField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransactionNumber => write!(f, "transactionNumber"),
            Self::VoucherNumber => write!(f, "voucherNumber"),
        }
    }
}

/// Borrowed, store-agnostic view of the fields a [`StoreQuery`] inspects.
#[derive(Clone, Debug)]
pub struct DocumentView<'a> {
    pub kind: DocumentKind,
    pub status: &'a str,
    pub account: Option<&'a AccountRef>,
    pub bank: Option<&'a AccountRef>,
    pub date: NaiveDate,
    pub name: &'a str,
    pub description: &'a str,
    pub transaction_number: Option<&'a str>,
    pub voucher_number: &'a str,
    pub is_active: bool,
}

/// Filter predicate evaluated by a single store.
///
/// Every criterion is optional; an empty query admits everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreQuery {
    /// Only documents of this kind.
    pub kind: Option<DocumentKind>,
    /// Only documents whose status label matches (case-insensitive).
    pub status: Option<String>,
    /// Only documents booked against this account, either side.
    pub account: Option<AccountRef>,
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
    /// Case-insensitive substring over name, description and numbers.
    pub search: Option<String>,
    /// Skip soft-deleted documents.
    pub active_only: bool,
}

impl StoreQuery {
    /// A query that admits every document that has not been soft-deleted.
    pub fn active() -> Self {
        Self {
            active_only: true,
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_account(mut self, account: AccountRef) -> Self {
        self.account = Some(account);
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Returns `true` if the document satisfies every criterion.
    pub fn admits(&self, doc: &DocumentView<'_>) -> bool {
        if self.active_only && !doc.is_active {
            return false;
        }
        if let Some(kind) = self.kind {
            if doc.kind != kind {
                return false;
            }
        }
        if let Some(ref status) = self.status {
            if !doc.status.eq_ignore_ascii_case(status.trim()) {
                return false;
            }
        }
        if let Some(ref account) = self.account {
            if doc.account != Some(account) && doc.bank != Some(account) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if doc.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if doc.date > to {
                return false;
            }
        }
        if let Some(ref search) = self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() {
                let haystacks = [
                    Some(doc.name),
                    Some(doc.description),
                    doc.transaction_number,
                    Some(doc.voucher_number),
                ];
                let found = haystacks
                    .into_iter()
                    .flatten()
                    .any(|text| text.to_lowercase().contains(&needle));
                if !found {
                    return false;
                }
            }
        }
        true
    }
}
