use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Lifecycle state of a generic transaction-store document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    #[default]
    Draft,
    Posted,
    Void,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 3] = [Self::Draft, Self::Posted, Self::Void];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Posted => "Posted",
            Self::Void => "Void",
        }
    }

    /// `Void` admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Void)
    }
}

/// Lifecycle state of a receipt-store or payment-store document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiptStatus {
    #[default]
    Draft,
    Pending,
    Completed,
    Cancelled,
}

impl ReceiptStatus {
    pub const ALL: [ReceiptStatus; 4] =
        [Self::Draft, Self::Pending, Self::Completed, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// `Cancelled` admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TypeError::UnknownStatus(s.to_string()))
    }
}

impl FromStr for ReceiptStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TypeError::UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_draft() {
        assert_eq!(TransactionStatus::default(), TransactionStatus::Draft);
        assert_eq!(ReceiptStatus::default(), ReceiptStatus::Draft);
    }

    #[test]
    fn terminal_states() {
        assert!(TransactionStatus::Void.is_terminal());
        assert!(!TransactionStatus::Posted.is_terminal());
        assert!(ReceiptStatus::Cancelled.is_terminal());
        assert!(!ReceiptStatus::Completed.is_terminal());
    }

    #[test]
    fn parse_statuses() {
        assert_eq!("posted".parse::<TransactionStatus>().unwrap(), TransactionStatus::Posted);
        assert_eq!("Pending".parse::<ReceiptStatus>().unwrap(), ReceiptStatus::Pending);
        assert!("Pending".parse::<TransactionStatus>().is_err());
        assert!("Posted".parse::<ReceiptStatus>().is_err());
    }

    #[test]
    fn serde_uses_variant_names() {
        let json = serde_json::to_string(&ReceiptStatus::Completed).unwrap();
        assert_eq!(json, "\"Completed\"");
    }
}
