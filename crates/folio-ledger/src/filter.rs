use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use folio_store::StoreQuery;
use folio_types::{AccountRef, DocumentKind};

/// Caller-facing filter over the merged ledger.
///
/// Translated into one [`StoreQuery`] per store. Soft-deleted transactions
/// are always excluded from ledger listings; look them up by id instead.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerFilter {
    #[serde(rename = "type")]
    pub kind: Option<DocumentKind>,
    pub status: Option<String>,
    pub account: Option<AccountRef>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub search: Option<String>,
}

impl LedgerFilter {
    pub fn new() -> Self {
        Self::default()
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

    /// Query for the generic transaction store.
    pub fn transaction_query(&self) -> StoreQuery {
        StoreQuery {
            active_only: true,
            ..self.base_query()
        }
    }

    /// Query for the receipt store, or `None` when the kind filter already
    /// rules every receipt out.
    pub fn receipt_query(&self) -> Option<StoreQuery> {
        self.store_query_for(DocumentKind::Receipt)
    }

    /// Query for the payment store, or `None` when the kind filter already
    /// rules every payment voucher out.
    pub fn payment_query(&self) -> Option<StoreQuery> {
        self.store_query_for(DocumentKind::Payment)
    }

    fn store_query_for(&self, kind: DocumentKind) -> Option<StoreQuery> {
        match self.kind {
            Some(wanted) if wanted != kind => None,
            _ => Some(self.base_query()),
        }
    }

    fn base_query(&self) -> StoreQuery {
        StoreQuery {
            kind: self.kind,
            status: self.status.clone(),
            account: self.account.clone(),
            from: self.from,
            to: self.to,
            search: self.search.clone(),
            active_only: false,
        }
    }
}
