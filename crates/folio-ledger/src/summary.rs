use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use folio_types::DocumentKind;

use crate::entry::LedgerEntry;

/// Count and summed amount of a group of entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub count: usize,
    pub amount: Decimal,
}

impl Totals {
    fn add(&mut self, amount: Decimal) {
        self.count += 1;
        self.amount += amount;
    }
}

/// Aggregate view over a set of ledger entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub total: Totals,
    pub by_kind: BTreeMap<DocumentKind, Totals>,
    pub by_status: BTreeMap<String, Totals>,
}

impl LedgerSummary {
    pub fn from_entries(entries: &[LedgerEntry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            summary.total.add(entry.amount);
            summary
                .by_kind
                .entry(entry.kind)
                .or_default()
                .add(entry.amount);
            summary
                .by_status
                .entry(entry.status.clone())
                .or_default()
                .add(entry.amount);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use folio_types::{DocumentId, PaymentMethod};

    use crate::entry::EntrySource;

    fn entry(kind: DocumentKind, status: &str, amount: i64) -> LedgerEntry {
        LedgerEntry {
            id: DocumentId::new(),
            source: EntrySource::Transaction,
            kind,
            transaction_number: String::new(),
            voucher_number: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            name: String::new(),
            description: String::new(),
            account: None,
            bank: None,
            amount: Decimal::new(amount, 2),
            payment_method: PaymentMethod::Cash,
            status: status.into(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_summary() {
        let s = LedgerSummary::from_entries(&[]);
        assert_eq!(s.total.count, 0);
        assert_eq!(s.total.amount, Decimal::ZERO);
        assert!(s.by_kind.is_empty());
    }

    #[test]
    fn groups_by_kind_and_status() {
        let s = LedgerSummary::from_entries(&[
            entry(DocumentKind::Invoice, "Posted", 10_050),
            entry(DocumentKind::Invoice, "Draft", 1_000),
            entry(DocumentKind::Receipt, "Completed", 2_525),
        ]);
        assert_eq!(s.total.count, 3);
        assert_eq!(s.total.amount, Decimal::new(13_575, 2));
        assert_eq!(s.by_kind[&DocumentKind::Invoice].count, 2);
        assert_eq!(s.by_kind[&DocumentKind::Invoice].amount, Decimal::new(11_050, 2));
        assert_eq!(s.by_status["Completed"].amount, Decimal::new(2_525, 2));
        assert!(!s.by_kind.contains_key(&DocumentKind::Bill));
    }
}
