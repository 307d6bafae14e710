//! Notifications emitted by successful mutating calls.

use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::amount::Amount;

/// A state change observable by external indexers.
///
/// Mints are reported as transfers from [`AccountId::NULL`] and burns as
/// transfers to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Balances of `from` and `to` changed by `amount`.
    Transfer {
        /// Debited account (null for mints).
        from: AccountId,
        /// Credited account (null for burns).
        to: AccountId,
        /// Amount moved.
        amount: Amount,
    },

    /// Allowance of `spender` over `owner`'s funds is now `amount`.
    Approval {
        /// Account granting the allowance.
        owner: AccountId,
        /// Account allowed to spend.
        spender: AccountId,
        /// New allowance value.
        amount: Amount,
    },

    /// Ownership moved from `previous` to `new` (null when renounced).
    OwnershipTransferred {
        /// Previous owner.
        previous: AccountId,
        /// New owner.
        new: AccountId,
    },

    /// `account` gained the minter role.
    MinterAdded {
        /// The new minter.
        account: AccountId,
    },

    /// `account` gave up the minter role.
    MinterRemoved {
        /// The former minter.
        account: AccountId,
    },
}

impl LedgerEvent {
    /// Short event name for logs and tables.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
            Self::MinterAdded { .. } => "MinterAdded",
            Self::MinterRemoved { .. } => "MinterRemoved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_tag() {
        let event = LedgerEvent::Transfer {
            from: AccountId::NULL,
            to: AccountId::new([7; 20]),
            amount: Amount::new(42),
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["event"], "transfer");
        assert_eq!(json["amount"], "42");
        let parsed: LedgerEvent = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, event);
    }

    #[test]
    fn event_names() {
        let account = AccountId::new([1; 20]);
        assert_eq!(LedgerEvent::MinterAdded { account }.name(), "MinterAdded");
        assert_eq!(
            LedgerEvent::OwnershipTransferred {
                previous: account,
                new: AccountId::NULL
            }
            .name(),
            "OwnershipTransferred"
        );
    }
}
