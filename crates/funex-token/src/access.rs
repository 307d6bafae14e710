//! Access control for minting.
//!
//! Two interchangeable models implement [`AccessControl`]:
//!
//! - [`SingleOwner`]: one transferable, renounceable owner may mint.
//! - [`MinterRole`]: any member of an open minter set may mint and deputize
//!   further minters; members may renounce their own role.
//!
//! The ledger only asks [`AccessControl::can_mint`]. Administrative
//! operations live on the concrete types and are reached through
//! [`Ledger::access`](crate::Ledger::access) wrappers that emit events.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::error::{LedgerError, ParseError, Result};

/// Which access-control model a token was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessModel {
    /// A single owner may mint.
    SingleOwner,
    /// Any member of the minter set may mint.
    MinterRole,
}

impl fmt::Display for AccessModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleOwner => write!(f, "single-owner"),
            Self::MinterRole => write!(f, "minter-role"),
        }
    }
}

impl FromStr for AccessModel {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "single-owner" | "owner" => Ok(Self::SingleOwner),
            "minter-role" | "minter" => Ok(Self::MinterRole),
            other => Err(ParseError::Unknown {
                what: "access model",
                value: other.to_string(),
            }),
        }
    }
}

/// Capability check consulted by the ledger before minting.
pub trait AccessControl {
    /// The model this implementation represents.
    fn model(&self) -> AccessModel;

    /// Whether `caller` may increase the total supply.
    fn can_mint(&self, caller: AccountId) -> bool;

    /// Check structural invariants of restored state.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    fn check_invariants(&self) -> std::result::Result<(), String>;
}

// ─────────────────────────────────────────────────────────────
// Single owner
// ─────────────────────────────────────────────────────────────

/// Ownership state of a [`SingleOwner`] token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "owner", rename_all = "snake_case")]
pub enum Ownership {
    /// The account currently holding ownership.
    Owned(AccountId),
    /// Ownership was renounced. Terminal.
    Ownerless,
}

impl Ownership {
    /// Whether ownership has been renounced.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Ownerless)
    }
}

/// Single transferable, renounceable owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleOwner {
    ownership: Ownership,
}

impl SingleOwner {
    /// Create with `owner` as the initial owner.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidOwner`] if `owner` is the null account.
    pub fn new(owner: AccountId) -> Result<Self> {
        if owner.is_null() {
            return Err(LedgerError::InvalidOwner);
        }
        Ok(Self {
            ownership: Ownership::Owned(owner),
        })
    }

    /// Current ownership state.
    #[must_use]
    pub const fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Current owner, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<AccountId> {
        match self.ownership {
            Ownership::Owned(owner) => Some(owner),
            Ownership::Ownerless => None,
        }
    }

    /// Current owner, or the null account once renounced.
    #[must_use]
    pub fn owner_or_null(&self) -> AccountId {
        self.owner().unwrap_or(AccountId::NULL)
    }

    /// Whether `account` is the current owner.
    #[must_use]
    pub fn is_owner(&self, account: AccountId) -> bool {
        self.ownership == Ownership::Owned(account)
    }

    fn ensure_owner(&self, caller: AccountId) -> Result<AccountId> {
        match self.ownership {
            Ownership::Owned(owner) if owner == caller => Ok(owner),
            _ => Err(LedgerError::unauthorized(caller)),
        }
    }

    /// Hand ownership to `new_owner`. Returns the previous owner.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Unauthorized`] unless `caller` is the owner;
    /// [`LedgerError::InvalidOwner`] if `new_owner` is null.
    pub fn transfer_ownership(&mut self, caller: AccountId, new_owner: AccountId) -> Result<AccountId> {
        let previous = self.ensure_owner(caller)?;
        if new_owner.is_null() {
            return Err(LedgerError::InvalidOwner);
        }
        self.ownership = Ownership::Owned(new_owner);
        Ok(previous)
    }

    /// Give up ownership for good. Returns the previous owner.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Unauthorized`] unless `caller` is the owner, which
    /// includes every call after ownership was already renounced.
    pub fn renounce_ownership(&mut self, caller: AccountId) -> Result<AccountId> {
        let previous = self.ensure_owner(caller)?;
        self.ownership = Ownership::Ownerless;
        Ok(previous)
    }
}

impl AccessControl for SingleOwner {
    fn model(&self) -> AccessModel {
        AccessModel::SingleOwner
    }

    fn can_mint(&self, caller: AccountId) -> bool {
        self.is_owner(caller)
    }

    fn check_invariants(&self) -> std::result::Result<(), String> {
        match self.ownership {
            Ownership::Owned(owner) if owner.is_null() => {
                Err("owned state names the null account".to_string())
            }
            _ => Ok(()),
        }
    }
}

// ─────────────────────────────────────────────────────────────
// Minter role
// ─────────────────────────────────────────────────────────────

/// Open set of accounts holding the minter capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinterRole {
    minters: BTreeSet<AccountId>,
}

impl MinterRole {
    /// Create with `initial` as the only minter.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidMinter`] if `initial` is the null account.
    pub fn new(initial: AccountId) -> Result<Self> {
        if initial.is_null() {
            return Err(LedgerError::InvalidMinter { account: initial });
        }
        Ok(Self {
            minters: BTreeSet::from([initial]),
        })
    }

    /// Whether `account` holds the minter role.
    #[must_use]
    pub fn is_minter(&self, account: AccountId) -> bool {
        self.minters.contains(&account)
    }

    /// Current minters in ascending identifier order.
    pub fn minters(&self) -> impl Iterator<Item = AccountId> + '_ {
        self.minters.iter().copied()
    }

    /// Number of minters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.minters.len()
    }

    /// Whether no account can mint any more.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.minters.is_empty()
    }

    /// Grant the role to `new_minter`. Only existing minters may do this.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Unauthorized`] unless `caller` is a minter;
    /// [`LedgerError::InvalidMinter`] if `new_minter` is null or already a
    /// minter.
    pub fn add_minter(&mut self, caller: AccountId, new_minter: AccountId) -> Result<()> {
        if !self.is_minter(caller) {
            return Err(LedgerError::unauthorized(caller));
        }
        if new_minter.is_null() || self.is_minter(new_minter) {
            return Err(LedgerError::InvalidMinter {
                account: new_minter,
            });
        }
        self.minters.insert(new_minter);
        Ok(())
    }

    /// Drop the caller's own role. The set may become empty.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NotAMinter`] if `caller` holds no role.
    pub fn renounce_minter(&mut self, caller: AccountId) -> Result<()> {
        if !self.minters.remove(&caller) {
            return Err(LedgerError::NotAMinter { account: caller });
        }
        Ok(())
    }
}

impl AccessControl for MinterRole {
    fn model(&self) -> AccessModel {
        AccessModel::MinterRole
    }

    fn can_mint(&self, caller: AccountId) -> bool {
        self.is_minter(caller)
    }

    fn check_invariants(&self) -> std::result::Result<(), String> {
        if self.minters.contains(&AccountId::NULL) {
            return Err("minter set contains the null account".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8) -> AccountId {
        AccountId::new([byte; 20])
    }

    #[test]
    fn single_owner_rejects_null_initial_owner() {
        assert_eq!(SingleOwner::new(AccountId::NULL), Err(LedgerError::InvalidOwner));
    }

    #[test]
    fn only_owner_can_mint() {
        let access = SingleOwner::new(account(1)).expect("owner");
        assert!(access.can_mint(account(1)));
        assert!(!access.can_mint(account(2)));
        assert!(!access.can_mint(AccountId::NULL));
        assert_eq!(access.model(), AccessModel::SingleOwner);
    }

    #[test]
    fn transfer_ownership_moves_capability() {
        let mut access = SingleOwner::new(account(1)).expect("owner");
        let previous = access
            .transfer_ownership(account(1), account(2))
            .expect("transfer");
        assert_eq!(previous, account(1));
        assert_eq!(access.owner(), Some(account(2)));
        assert!(access.can_mint(account(2)));
        assert!(!access.can_mint(account(1)));
    }

    #[test]
    fn transfer_ownership_requires_owner() {
        let mut access = SingleOwner::new(account(1)).expect("owner");
        let err = access.transfer_ownership(account(2), account(3));
        assert_eq!(err, Err(LedgerError::unauthorized(account(2))));
        assert_eq!(access.owner(), Some(account(1)));
    }

    #[test]
    fn transfer_ownership_rejects_null() {
        let mut access = SingleOwner::new(account(1)).expect("owner");
        let err = access.transfer_ownership(account(1), AccountId::NULL);
        assert_eq!(err, Err(LedgerError::InvalidOwner));
        assert_eq!(access.owner(), Some(account(1)));
    }

    #[test]
    fn unauthorized_is_checked_before_null_owner() {
        let mut access = SingleOwner::new(account(1)).expect("owner");
        let err = access.transfer_ownership(account(2), AccountId::NULL);
        assert_eq!(err, Err(LedgerError::unauthorized(account(2))));
    }

    #[test]
    fn renounce_is_terminal() {
        let mut access = SingleOwner::new(account(1)).expect("owner");
        access.renounce_ownership(account(1)).expect("renounce");
        assert!(access.ownership().is_terminal());
        assert_eq!(access.owner(), None);
        assert_eq!(access.owner_or_null(), AccountId::NULL);
        assert!(!access.can_mint(account(1)));
        assert!(!access.can_mint(AccountId::NULL));

        assert_eq!(
            access.renounce_ownership(account(1)),
            Err(LedgerError::unauthorized(account(1)))
        );
        assert_eq!(
            access.transfer_ownership(account(1), account(2)),
            Err(LedgerError::unauthorized(account(1)))
        );
    }

    #[test]
    fn renounce_requires_owner() {
        let mut access = SingleOwner::new(account(1)).expect("owner");
        assert_eq!(
            access.renounce_ownership(account(2)),
            Err(LedgerError::unauthorized(account(2)))
        );
        assert_eq!(access.owner(), Some(account(1)));
    }

    #[test]
    fn ownership_serde_roundtrip() {
        let mut access = SingleOwner::new(account(1)).expect("owner");
        let json = serde_json::to_value(&access).expect("serialize");
        assert_eq!(json["ownership"]["state"], "owned");
        let parsed: SingleOwner = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, access);

        access.renounce_ownership(account(1)).expect("renounce");
        let json = serde_json::to_string(&access).expect("serialize");
        let parsed: SingleOwner = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.ownership(), Ownership::Ownerless);
    }

    #[test]
    fn minter_role_starts_with_initializer() {
        let access = MinterRole::new(account(1)).expect("minter");
        assert!(access.is_minter(account(1)));
        assert!(access.can_mint(account(1)));
        assert!(!access.can_mint(account(2)));
        assert_eq!(access.len(), 1);
        assert_eq!(access.model(), AccessModel::MinterRole);
    }

    #[test]
    fn minter_role_rejects_null_initializer() {
        assert_eq!(
            MinterRole::new(AccountId::NULL),
            Err(LedgerError::InvalidMinter {
                account: AccountId::NULL
            })
        );
    }

    #[test]
    fn minter_can_deputize() {
        let mut access = MinterRole::new(account(1)).expect("minter");
        access.add_minter(account(1), account(2)).expect("add");
        access.add_minter(account(2), account(3)).expect("add by deputy");
        let minters: Vec<_> = access.minters().collect();
        assert_eq!(minters, vec![account(1), account(2), account(3)]);
    }

    #[test]
    fn non_minter_cannot_deputize() {
        let mut access = MinterRole::new(account(1)).expect("minter");
        assert_eq!(
            access.add_minter(account(2), account(3)),
            Err(LedgerError::unauthorized(account(2)))
        );
        assert!(!access.is_minter(account(3)));
    }

    #[test]
    fn add_minter_rejects_null_and_duplicates() {
        let mut access = MinterRole::new(account(1)).expect("minter");
        assert_eq!(
            access.add_minter(account(1), AccountId::NULL),
            Err(LedgerError::InvalidMinter {
                account: AccountId::NULL
            })
        );
        assert_eq!(
            access.add_minter(account(1), account(1)),
            Err(LedgerError::InvalidMinter { account: account(1) })
        );
        assert_eq!(access.len(), 1);
    }

    #[test]
    fn renounce_minter_may_empty_the_set() {
        let mut access = MinterRole::new(account(1)).expect("minter");
        access.renounce_minter(account(1)).expect("renounce");
        assert!(access.is_empty());
        assert!(!access.can_mint(account(1)));
        assert_eq!(
            access.renounce_minter(account(1)),
            Err(LedgerError::NotAMinter { account: account(1) })
        );
        assert_eq!(
            access.add_minter(account(1), account(2)),
            Err(LedgerError::unauthorized(account(1)))
        );
    }

    #[test]
    fn invariant_checks_catch_null_members() {
        let json = format!(r#"{{"minters":["{}"]}}"#, AccountId::NULL);
        let restored: MinterRole = serde_json::from_str(&json).expect("deserialize");
        assert!(restored.check_invariants().is_err());

        let json = format!(r#"{{"ownership":{{"state":"owned","owner":"{}"}}}}"#, AccountId::NULL);
        let restored: SingleOwner = serde_json::from_str(&json).expect("deserialize");
        assert!(restored.check_invariants().is_err());
    }

    #[test]
    fn access_model_parse_and_display() {
        assert_eq!("single-owner".parse::<AccessModel>(), Ok(AccessModel::SingleOwner));
        assert_eq!("minter".parse::<AccessModel>(), Ok(AccessModel::MinterRole));
        assert!("admin".parse::<AccessModel>().is_err());
        assert_eq!(AccessModel::MinterRole.to_string(), "minter-role");
    }
}
