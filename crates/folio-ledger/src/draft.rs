//! Caller input for creating and editing documents.
//!
//! Drafts carry business fields only. Identifiers, status and timestamps are
//! always assigned by [`Books`](crate::Books).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_types::{AccountRef, DocumentKind, PaymentMethod};

use crate::error::{LedgerError, Result};

/// A new generic transaction-store document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub date: NaiveDate,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub account: Option<AccountRef>,
    #[serde(default)]
    pub bank: Option<AccountRef>,
    pub amount: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// A new receipt for the receipt store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReceipt {
    pub date: NaiveDate,
    pub customer_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub account: Option<AccountRef>,
    #[serde(default)]
    pub bank: Option<AccountRef>,
    pub amount: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// A new payment voucher for the payment store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub date: NaiveDate,
    pub supplier_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub account: Option<AccountRef>,
    #[serde(default)]
    pub bank: Option<AccountRef>,
    pub amount: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Edits to the business fields of an existing document. `None` leaves a
/// field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentPatch {
    pub date: Option<NaiveDate>,
    /// Counterparty name; the customer on receipts, the supplier on payments.
    pub name: Option<String>,
    pub description: Option<String>,
    pub account: Option<AccountRef>,
    pub bank: Option<AccountRef>,
    pub amount: Option<Decimal>,
    pub payment_method: Option<PaymentMethod>,
}

impl DocumentPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub(crate) fn require_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

/// Receipt and payment vouchers only record cash-like settlement.
pub(crate) fn require_voucher_method(method: PaymentMethod) -> Result<()> {
    if !method.is_voucher_method() {
        return Err(LedgerError::Validation(format!(
            "payment method {method} is not accepted on vouchers"
        )));
    }
    Ok(())
}

impl NewTransaction {
    pub(crate) fn validate(&self) -> Result<()> {
        require_name("name", &self.name)
    }
}

impl NewReceipt {
    pub(crate) fn validate(&self) -> Result<()> {
        require_name("customerName", &self.customer_name)?;
        require_voucher_method(self.payment_method)
    }
}

impl NewPayment {
    pub(crate) fn validate(&self) -> Result<()> {
        require_name("supplierName", &self.supplier_name)?;
        require_voucher_method(self.payment_method)
    }
}
