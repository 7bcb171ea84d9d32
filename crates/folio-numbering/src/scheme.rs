use std::fmt;

use folio_store::NumberField;
use folio_types::{DocumentKind, Period};

/// Prefix of every transaction number, followed by `YYMM`.
pub const TRANSACTION_PREFIX: &str = "TXN";

/// Prefix of receipt-store voucher numbers (global, no period).
pub const RECEIPT_VOUCHER_PREFIX: &str = "RCP";

/// Prefix of payment-store voucher numbers (global, no period).
pub const PAYMENT_VOUCHER_PREFIX: &str = "PV";

/// One of the identifier formats Folio issues.
///
/// | scheme               | example       | sequence scope |
/// |----------------------|---------------|----------------|
/// | `Transaction`        | `TXN24060001` | per period     |
/// | `TransactionVoucher` | `R24060001`   | per kind+period|
/// | `ReceiptVoucher`     | `RCP0001`     | global         |
/// | `PaymentVoucher`     | `PV0001`      | global         |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumberScheme {
    Transaction { period: Period },
    TransactionVoucher { kind: DocumentKind, period: Period },
    ReceiptVoucher,
    PaymentVoucher,
}

impl NumberScheme {
    /// The exact prefix under which the sequence is scoped.
    pub fn prefix(&self) -> String {
        match self {
            Self::Transaction { period } => format!("{TRANSACTION_PREFIX}{}", period.yymm()),
            Self::TransactionVoucher { kind, period } => {
                format!("{}{}", kind.voucher_letter(), period.yymm())
            }
            Self::ReceiptVoucher => RECEIPT_VOUCHER_PREFIX.to_string(),
            Self::PaymentVoucher => PAYMENT_VOUCHER_PREFIX.to_string(),
        }
    }

    /// The store field the identifier is written to.
    pub fn field(&self) -> NumberField {
        match self {
            Self::Transaction { .. } => NumberField::TransactionNumber,
            _ => NumberField::VoucherNumber,
        }
    }

    /// Render `sequence` under this scheme, zero-padded to at least `width`.
    pub fn format(&self, sequence: u64, width: usize) -> String {
        format!("{}{:0width$}", self.prefix(), sequence, width = width)
    }
}

impl fmt::Display for NumberScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transaction { period } => write!(f, "transaction number ({period})"),
            Self::TransactionVoucher { kind, period } => {
                write!(f, "{kind} voucher number ({period})")
            }
            Self::ReceiptVoucher => write!(f, "receipt voucher number"),
            Self::PaymentVoucher => write!(f, "payment voucher number"),
        }
    }
}
