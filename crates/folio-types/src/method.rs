use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// How money moved for a document.
///
/// Receipts and payments accept every method except `Card`; generic
/// transactions accept the full set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Cash,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    Cheque,
    #[serde(rename = "Mobile Money")]
    MobileMoney,
    Card,
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        Self::Cash,
        Self::BankTransfer,
        Self::Cheque,
        Self::MobileMoney,
        Self::Card,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::BankTransfer => "Bank Transfer",
            Self::Cheque => "Cheque",
            Self::MobileMoney => "Mobile Money",
            Self::Card => "Card",
            Self::Other => "Other",
        }
    }

    /// Whether the receipt and payment stores accept this method.
    pub fn is_voucher_method(&self) -> bool {
        !matches!(self, Self::Card)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = TypeError;

    /// Accepts display names and compact spellings (`bank-transfer`,
    /// `mobile_money`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalize = |text: &str| -> String {
            text.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect()
        };
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|method| normalize(method.as_str()) == wanted)
            .ok_or_else(|| TypeError::UnknownPaymentMethod(s.to_string()))
    }
}
