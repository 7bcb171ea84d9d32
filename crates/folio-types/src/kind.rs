use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The business type of a financial document.
///
/// Documents in the generic transaction store may carry any kind; documents
/// in the receipt store are always `Receipt` and documents in the payment
/// store are always `Payment`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentKind {
    Receipt,
    Payment,
    Invoice,
    Bill,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [Self::Receipt, Self::Payment, Self::Invoice, Self::Bill];

    /// Letter used to prefix transaction-store voucher numbers (`R2406...`).
    pub fn voucher_letter(&self) -> char {
        match self {
            Self::Receipt => 'R',
            Self::Payment => 'P',
            Self::Invoice => 'I',
            Self::Bill => 'B',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receipt => "Receipt",
            Self::Payment => "Payment",
            Self::Invoice => "Invoice",
            Self::Bill => "Bill",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TypeError::UnknownKind(s.to_string()))
    }
}
