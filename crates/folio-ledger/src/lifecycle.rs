//! Document status machines.
//!
//! Generic transactions move `Draft -> Posted -> Void`. Receipts and payment
//! vouchers share a four-state machine:
//!
//! ```text
//!   Draft --submit--> Pending
//!   Draft | Pending --post--> Completed
//!   Draft | Pending | Completed --void--> Cancelled
//! ```
//!
//! Statuses only move forward; terminal statuses accept no action.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use folio_types::{ReceiptStatus, TransactionStatus};

use crate::error::LedgerError;

/// A requested lifecycle step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleAction {
    Submit,
    Post,
    Void,
}

impl LifecycleAction {
    pub const ALL: [LifecycleAction; 3] = [Self::Submit, Self::Post, Self::Void];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Post => "post",
            Self::Void => "void",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleAction {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LedgerError::Validation(format!("unknown action: {s}")))
    }
}

/// A status that moves through a fixed set of forward transitions.
pub trait Lifecycle: Copy + PartialEq + fmt::Display {
    /// The status after `action`, or `None` if the action is not permitted
    /// from here.
    fn apply(self, action: LifecycleAction) -> Option<Self>;

    /// Whether no action is permitted from this status.
    fn is_terminal(self) -> bool {
        LifecycleAction::ALL
            .into_iter()
            .all(|action| self.apply(action).is_none())
    }

    /// Whether a direct status assignment to `target` is allowed: either a
    /// no-op or reachable by a single permitted action.
    fn can_become(self, target: Self) -> bool {
        self == target
            || LifecycleAction::ALL
                .into_iter()
                .any(|action| self.apply(action) == Some(target))
    }
}

impl Lifecycle for TransactionStatus {
    fn apply(self, action: LifecycleAction) -> Option<Self> {
        use TransactionStatus::*;
        match (self, action) {
            (Draft, LifecycleAction::Post) => Some(Posted),
            (Draft | Posted, LifecycleAction::Void) => Some(Void),
            _ => None,
        }
    }
}

impl Lifecycle for ReceiptStatus {
    fn apply(self, action: LifecycleAction) -> Option<Self> {
        use ReceiptStatus::*;
        match (self, action) {
            (Draft, LifecycleAction::Submit) => Some(Pending),
            (Draft | Pending, LifecycleAction::Post) => Some(Completed),
            (Draft | Pending | Completed, LifecycleAction::Void) => Some(Cancelled),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn transaction_happy_path() {
        let posted = TransactionStatus::Draft
            .apply(LifecycleAction::Post)
            .unwrap();
        assert_eq!(posted, TransactionStatus::Posted);
        assert_eq!(
            posted.apply(LifecycleAction::Void),
            Some(TransactionStatus::Void)
        );
    }

    #[test]
    fn transaction_rejections() {
        assert_eq!(TransactionStatus::Posted.apply(LifecycleAction::Post), None);
        assert_eq!(TransactionStatus::Void.apply(LifecycleAction::Post), None);
        assert_eq!(TransactionStatus::Void.apply(LifecycleAction::Void), None);
        assert_eq!(TransactionStatus::Draft.apply(LifecycleAction::Submit), None);
    }

    #[test]
    fn draft_transaction_can_be_voided() {
        assert_eq!(
            TransactionStatus::Draft.apply(LifecycleAction::Void),
            Some(TransactionStatus::Void)
        );
    }

    #[test]
    fn receipt_machine() {
        use ReceiptStatus::*;
        assert_eq!(Draft.apply(LifecycleAction::Submit), Some(Pending));
        assert_eq!(Pending.apply(LifecycleAction::Post), Some(Completed));
        assert_eq!(Draft.apply(LifecycleAction::Post), Some(Completed));
        assert_eq!(Completed.apply(LifecycleAction::Void), Some(Cancelled));
        assert_eq!(Pending.apply(LifecycleAction::Submit), None);
        assert_eq!(Completed.apply(LifecycleAction::Post), None);
        assert_eq!(Cancelled.apply(LifecycleAction::Post), None);
        assert_eq!(Cancelled.apply(LifecycleAction::Void), None);
    }

    #[test]
    fn direct_assignment_follows_the_machine() {
        use ReceiptStatus::*;
        assert!(Draft.can_become(Draft));
        assert!(Draft.can_become(Pending));
        assert!(Pending.can_become(Cancelled));
        assert!(!Completed.can_become(Pending));
        assert!(!Cancelled.can_become(Draft));
        assert!(!TransactionStatus::Void.can_become(TransactionStatus::Posted));
    }

    #[test]
    fn action_parsing() {
        assert_eq!("POST".parse::<LifecycleAction>().unwrap(), LifecycleAction::Post);
        assert_eq!(" void ".parse::<LifecycleAction>().unwrap(), LifecycleAction::Void);
        assert!("approve".parse::<LifecycleAction>().is_err());
    }

    fn any_receipt_status() -> impl Strategy<Value = ReceiptStatus> {
        proptest::sample::select(ReceiptStatus::ALL.to_vec())
    }

    fn any_transaction_status() -> impl Strategy<Value = TransactionStatus> {
        proptest::sample::select(TransactionStatus::ALL.to_vec())
    }

    fn any_action() -> impl Strategy<Value = LifecycleAction> {
        proptest::sample::select(LifecycleAction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn terminal_receipt_statuses_accept_nothing(
            status in any_receipt_status(),
            action in any_action(),
        ) {
            if status.is_terminal() {
                prop_assert_eq!(status.apply(action), None);
            }
        }

        #[test]
        fn terminal_transaction_statuses_accept_nothing(
            status in any_transaction_status(),
            action in any_action(),
        ) {
            if status.is_terminal() {
                prop_assert_eq!(status.apply(action), None);
            }
        }

        #[test]
        fn terminality_follows_the_machine(
            status in any_receipt_status(),
            other in any_transaction_status(),
        ) {
            prop_assert_eq!(Lifecycle::is_terminal(status), ReceiptStatus::is_terminal(&status));
            prop_assert_eq!(Lifecycle::is_terminal(other), TransactionStatus::is_terminal(&other));
        }

        #[test]
        fn actions_never_return_to_draft(status in any_receipt_status(), action in any_action()) {
            prop_assert_ne!(status.apply(action), Some(ReceiptStatus::Draft));
        }
    }
}
