//! JSON snapshots of ledger state.
//!
//! A snapshot captures metadata, supply, every balance and allowance entry,
//! and the access-control state. Pending events are not part of it.
//! Restoring re-checks conservation and the access-control invariants, so a
//! hand-edited file cannot produce a ledger that violates them.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::access::AccessControl;
use crate::account::AccountId;
use crate::amount::Amount;
use crate::error::StoreError;
use crate::ledger::{Ledger, TokenMetadata};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One allowance entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AllowanceEntry {
    /// Account whose funds may be spent.
    pub owner: AccountId,
    /// Account allowed to spend.
    pub spender: AccountId,
    /// Remaining allowance.
    pub amount: Amount,
}

/// Serializable image of a [`Ledger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot<A> {
    /// Format version.
    pub version: u32,
    /// Token metadata.
    pub metadata: TokenMetadata,
    /// Total supply.
    pub total_supply: Amount,
    /// Balances by account.
    pub balances: BTreeMap<AccountId, Amount>,
    /// Allowances, sorted by owner then spender.
    pub allowances: Vec<AllowanceEntry>,
    /// Access-control state.
    pub access: A,
}

impl<A: AccessControl + Clone> Ledger<A> {
    /// Capture the current state.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot<A> {
        let mut allowances: Vec<_> = self
            .allowances()
            .map(|(owner, spender, amount)| AllowanceEntry {
                owner,
                spender,
                amount,
            })
            .collect();
        allowances.sort();

        LedgerSnapshot {
            version: SNAPSHOT_VERSION,
            metadata: self.metadata().clone(),
            total_supply: self.total_supply(),
            balances: self.balances().collect(),
            allowances,
            access: self.access().clone(),
        }
    }

    /// Rebuild a ledger from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the snapshot has an unknown
    /// version, a balance or allowance involving the null account, a
    /// duplicated allowance, balances that do not sum to the total supply,
    /// or access-control state that violates its invariants.
    pub fn restore(snapshot: LedgerSnapshot<A>) -> Result<Self, StoreError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::Corrupt(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        if snapshot.balances.contains_key(&AccountId::NULL) {
            return Err(StoreError::Corrupt(
                "balance recorded for the null account".to_string(),
            ));
        }

        let sum = Amount::checked_sum(snapshot.balances.values().copied())
            .ok_or_else(|| StoreError::Corrupt("balances overflow".to_string()))?;
        if sum != snapshot.total_supply {
            return Err(StoreError::Corrupt(format!(
                "balances sum to {sum} but total supply is {}",
                snapshot.total_supply
            )));
        }

        let mut allowances = HashMap::with_capacity(snapshot.allowances.len());
        for entry in &snapshot.allowances {
            if entry.owner.is_null() || entry.spender.is_null() {
                return Err(StoreError::Corrupt(
                    "allowance involves the null account".to_string(),
                ));
            }
            if allowances
                .insert((entry.owner, entry.spender), entry.amount)
                .is_some()
            {
                return Err(StoreError::Corrupt(format!(
                    "duplicate allowance {} -> {}",
                    entry.owner, entry.spender
                )));
            }
        }

        snapshot.access.check_invariants().map_err(StoreError::Corrupt)?;

        Ok(Self::from_parts(
            snapshot.metadata,
            snapshot.total_supply,
            snapshot.balances.into_iter().collect(),
            allowances,
            snapshot.access,
        ))
    }
}

impl<A> Ledger<A>
where
    A: AccessControl + Clone + Serialize + DeserializeOwned,
{
    /// Write a snapshot to `path` as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        write_json(path.as_ref(), &self.snapshot())
    }

    /// Read and restore a snapshot from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the
    /// snapshot is corrupt.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::restore(read_json(path.as_ref())?)
    }
}

/// Serialize `value` to `path`, replacing any existing file only once the
/// new content is fully written.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    debug!(path = %path.display(), "snapshot written");
    Ok(())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&contents)?;
    debug!(path = %path.display(), "snapshot read");
    Ok(value)
}
