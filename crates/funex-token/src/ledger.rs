//! The token ledger.
//!
//! [`Ledger`] owns balances, total supply and the allowance table, and is
//! generic over the [`AccessControl`] model gating mints.
//!
//! # Atomicity
//!
//! Every mutating operation first validates its inputs and computes every
//! new field value with checked arithmetic, and only then writes. A call
//! that returns `Err` therefore leaves the ledger untouched and emits no
//! events.
//!
//! # Invariants
//!
//! - `total_supply == Σ balances` after every call
//! - no balance or allowance is ever negative (amounts are unsigned and all
//!   subtraction is checked)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::access::{AccessControl, MinterRole, SingleOwner};
use crate::account::AccountId;
use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::event::LedgerEvent;

/// Immutable descriptive token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    name: String,
    symbol: String,
    decimals: u8,
}

impl TokenMetadata {
    /// Create token metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Token name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of decimals used for display by clients.
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }
}

/// Staged balance movement, computed before any write.
#[derive(Debug, Clone, Copy)]
struct BalanceMove {
    from: AccountId,
    to: AccountId,
    amount: Amount,
    from_balance: Amount,
    to_balance: Amount,
}

/// Fungible-token ledger.
#[derive(Debug, Clone)]
pub struct Ledger<A> {
    metadata: TokenMetadata,
    total_supply: Amount,
    balances: HashMap<AccountId, Amount>,
    allowances: HashMap<(AccountId, AccountId), Amount>,
    access: A,
    events: Vec<LedgerEvent>,
}

impl<A: AccessControl> Ledger<A> {
    /// Create an empty ledger with zero supply.
    #[must_use]
    pub fn new(metadata: TokenMetadata, access: A) -> Self {
        Self {
            metadata,
            total_supply: Amount::ZERO,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            access,
            events: Vec::new(),
        }
    }

    /// Create a ledger and credit `initial_supply` to `holder`.
    ///
    /// The genesis credit bypasses access control and is reported as a
    /// mint (a transfer from the null account). A zero supply emits nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRecipient`] if `holder` is null and the
    /// supply is non-zero.
    pub fn with_initial_supply(
        metadata: TokenMetadata,
        access: A,
        holder: AccountId,
        initial_supply: Amount,
    ) -> Result<Self> {
        let mut ledger = Self::new(metadata, access);
        if !initial_supply.is_zero() {
            ledger.credit_supply(holder, initial_supply)?;
        }
        info!(
            symbol = %ledger.metadata.symbol,
            model = %ledger.access.model(),
            %holder,
            supply = %initial_supply,
            "ledger initialized"
        );
        Ok(ledger)
    }

    /// Rebuild a ledger from persisted parts without emitting events.
    pub(crate) fn from_parts(
        metadata: TokenMetadata,
        total_supply: Amount,
        balances: HashMap<AccountId, Amount>,
        allowances: HashMap<(AccountId, AccountId), Amount>,
        access: A,
    ) -> Self {
        Self {
            metadata,
            total_supply,
            balances,
            allowances,
            access,
            events: Vec::new(),
        }
    }

    // -------- read API --------

    /// Token metadata.
    #[must_use]
    pub const fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Access-control state.
    #[must_use]
    pub const fn access(&self) -> &A {
        &self.access
    }

    /// Total amount in circulation.
    #[must_use]
    pub const fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance of `account`; zero for unknown accounts.
    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    /// Remaining amount `spender` may move out of `owner`'s balance.
    #[must_use]
    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Whether `caller` may mint under the configured access model.
    #[must_use]
    pub fn can_mint(&self, caller: AccountId) -> bool {
        self.access.can_mint(caller)
    }

    /// Every account with a recorded balance, including zero balances.
    pub fn balances(&self) -> impl Iterator<Item = (AccountId, Amount)> + '_ {
        self.balances.iter().map(|(account, amount)| (*account, *amount))
    }

    /// Every recorded allowance as `(owner, spender, amount)`.
    pub fn allowances(&self) -> impl Iterator<Item = (AccountId, AccountId, Amount)> + '_ {
        self.allowances
            .iter()
            .map(|((owner, spender), amount)| (*owner, *spender, *amount))
    }

    /// Events emitted since the last [`drain_events`](Self::drain_events).
    #[must_use]
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Take every pending event, oldest first.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recompute the sum of balances and compare it with the total supply.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        Amount::checked_sum(self.balances.values().copied()) == Some(self.total_supply)
    }

    // -------- write API --------

    /// Move `amount` from `caller` to `to`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidSender`] if `caller` is null,
    /// [`LedgerError::InvalidRecipient`] if `to` is null,
    /// [`LedgerError::InsufficientBalance`] if `amount` exceeds the caller's
    /// balance.
    pub fn transfer(&mut self, caller: AccountId, to: AccountId, amount: Amount) -> Result<()> {
        let planned = self.plan_move(caller, to, amount).inspect_err(|e| {
            debug!(%caller, %to, %amount, error = %e, "transfer rejected");
        })?;
        self.apply_move(planned);
        debug!(from = %caller, %to, %amount, "transfer");
        self.emit(LedgerEvent::Transfer {
            from: caller,
            to,
            amount,
        });
        Ok(())
    }

    /// Set the allowance of `spender` over the caller's funds to `amount`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidSender`] if `caller` is null,
    /// [`LedgerError::InvalidSpender`] if `spender` is null.
    pub fn approve(&mut self, caller: AccountId, spender: AccountId, amount: Amount) -> Result<()> {
        Self::check_approval_parties(caller, spender)?;
        self.set_allowance(caller, spender, amount);
        Ok(())
    }

    /// Raise the allowance of `spender` by `delta`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidSender`] / [`LedgerError::InvalidSpender`] for
    /// null parties, [`LedgerError::ArithmeticOverflow`] if the result exceeds
    /// [`Amount::MAX`].
    pub fn increase_allowance(
        &mut self,
        caller: AccountId,
        spender: AccountId,
        delta: Amount,
    ) -> Result<()> {
        Self::check_approval_parties(caller, spender)?;
        let updated = self
            .allowance(caller, spender)
            .checked_add(delta)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.set_allowance(caller, spender, updated);
        Ok(())
    }

    /// Lower the allowance of `spender` by `delta`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidSender`] / [`LedgerError::InvalidSpender`] for
    /// null parties, [`LedgerError::AllowanceUnderflow`] if `delta` exceeds
    /// the current allowance.
    pub fn decrease_allowance(
        &mut self,
        caller: AccountId,
        spender: AccountId,
        delta: Amount,
    ) -> Result<()> {
        Self::check_approval_parties(caller, spender)?;
        let current = self.allowance(caller, spender);
        let updated = current
            .checked_sub(delta)
            .ok_or(LedgerError::AllowanceUnderflow { current, delta })?;
        self.set_allowance(caller, spender, updated);
        Ok(())
    }

    /// Spend allowance granted by `from` to move `amount` from `from` to `to`.
    ///
    /// The allowance `(from, caller)` is reduced by exactly `amount`; there
    /// is no unlimited-allowance sentinel.
    ///
    /// # Errors
    ///
    /// Checked in order: [`LedgerError::InvalidSender`] (`from` null),
    /// [`LedgerError::InvalidRecipient`] (`to` null),
    /// [`LedgerError::InsufficientBalance`],
    /// [`LedgerError::InsufficientAllowance`].
    pub fn transfer_from(
        &mut self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()> {
        let planned = self.plan_move(from, to, amount)?;

        let current = self.allowance(from, caller);
        let remaining = current
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientAllowance {
                owner: from,
                spender: caller,
                have: current,
                need: amount,
            })
            .inspect_err(|e| debug!(%caller, %from, %amount, error = %e, "transfer_from rejected"))?;

        self.apply_move(planned);
        self.allowances.insert((from, caller), remaining);
        debug!(spender = %caller, %from, %to, %amount, %remaining, "transfer_from");
        self.emit(LedgerEvent::Transfer { from, to, amount });
        self.emit(LedgerEvent::Approval {
            owner: from,
            spender: caller,
            amount: remaining,
        });
        Ok(())
    }

    /// Mint `amount` to the caller.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Unauthorized`] unless the access model lets `caller`
    /// mint, [`LedgerError::ArithmeticOverflow`] if the supply would exceed
    /// [`Amount::MAX`].
    pub fn mint(&mut self, caller: AccountId, amount: Amount) -> Result<()> {
        self.mint_to(caller, caller, amount)
    }

    /// Mint `amount` to `target`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Unauthorized`] (checked first),
    /// [`LedgerError::InvalidRecipient`] if `target` is null,
    /// [`LedgerError::ArithmeticOverflow`].
    pub fn mint_to(&mut self, caller: AccountId, target: AccountId, amount: Amount) -> Result<()> {
        if !self.access.can_mint(caller) {
            debug!(%caller, %amount, "mint rejected: caller may not mint");
            return Err(LedgerError::unauthorized(caller));
        }
        self.credit_supply(target, amount)?;
        info!(minter = %caller, %target, %amount, supply = %self.total_supply, "minted");
        Ok(())
    }

    /// Destroy `amount` of the caller's balance.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidSender`] if `caller` is null,
    /// [`LedgerError::InsufficientBalance`] if `amount` exceeds the balance.
    pub fn burn(&mut self, caller: AccountId, amount: Amount) -> Result<()> {
        if caller.is_null() {
            return Err(LedgerError::InvalidSender);
        }
        let have = self.balance_of(caller);
        let balance = have
            .checked_sub(amount)
            .ok_or(LedgerError::insufficient_balance(caller, have, amount))?;
        let supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.balances.insert(caller, balance);
        self.total_supply = supply;
        info!(%caller, %amount, supply = %self.total_supply, "burned");
        self.emit(LedgerEvent::Transfer {
            from: caller,
            to: AccountId::NULL,
            amount,
        });
        Ok(())
    }

    // -------- internals --------

    fn check_approval_parties(owner: AccountId, spender: AccountId) -> Result<()> {
        if owner.is_null() {
            return Err(LedgerError::InvalidSender);
        }
        if spender.is_null() {
            return Err(LedgerError::InvalidSpender);
        }
        Ok(())
    }

    fn set_allowance(&mut self, owner: AccountId, spender: AccountId, amount: Amount) {
        self.allowances.insert((owner, spender), amount);
        debug!(%owner, %spender, %amount, "allowance set");
        self.emit(LedgerEvent::Approval {
            owner,
            spender,
            amount,
        });
    }

    fn credit_supply(&mut self, target: AccountId, amount: Amount) -> Result<()> {
        if target.is_null() {
            return Err(LedgerError::InvalidRecipient);
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let balance = self
            .balance_of(target)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.total_supply = supply;
        self.balances.insert(target, balance);
        self.emit(LedgerEvent::Transfer {
            from: AccountId::NULL,
            to: target,
            amount,
        });
        Ok(())
    }

    fn plan_move(&self, from: AccountId, to: AccountId, amount: Amount) -> Result<BalanceMove> {
        if from.is_null() {
            return Err(LedgerError::InvalidSender);
        }
        if to.is_null() {
            return Err(LedgerError::InvalidRecipient);
        }
        let have = self.balance_of(from);
        let from_balance = have
            .checked_sub(amount)
            .ok_or(LedgerError::insufficient_balance(from, have, amount))?;
        // a self-transfer credits the already-debited balance
        let credit_base = if from == to {
            from_balance
        } else {
            self.balance_of(to)
        };
        let to_balance = credit_base
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        Ok(BalanceMove {
            from,
            to,
            amount,
            from_balance,
            to_balance,
        })
    }

    fn apply_move(&mut self, planned: BalanceMove) {
        self.balances.insert(planned.from, planned.from_balance);
        self.balances.insert(planned.to, planned.to_balance);
        debug_assert!(
            planned.from != planned.to || planned.to_balance == self.balance_of(planned.from),
            "self-transfer of {} changed the balance",
            planned.amount
        );
    }

    fn emit(&mut self, event: LedgerEvent) {
        debug!(event = event.name(), "emit");
        self.events.push(event);
    }
}

impl Ledger<SingleOwner> {
    /// Current owner, if ownership has not been renounced.
    #[must_use]
    pub const fn owner(&self) -> Option<AccountId> {
        self.access.owner()
    }

    /// Hand ownership to `new_owner`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Unauthorized`] unless `caller` is the owner,
    /// [`LedgerError::InvalidOwner`] if `new_owner` is null.
    pub fn transfer_ownership(&mut self, caller: AccountId, new_owner: AccountId) -> Result<()> {
        let previous = self.access.transfer_ownership(caller, new_owner)?;
        info!(%previous, new = %new_owner, "ownership transferred");
        self.emit(LedgerEvent::OwnershipTransferred {
            previous,
            new: new_owner,
        });
        Ok(())
    }

    /// Renounce ownership; minting is disabled for good.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Unauthorized`] unless `caller` is the owner.
    pub fn renounce_ownership(&mut self, caller: AccountId) -> Result<()> {
        let previous = self.access.renounce_ownership(caller)?;
        info!(%previous, "ownership renounced");
        self.emit(LedgerEvent::OwnershipTransferred {
            previous,
            new: AccountId::NULL,
        });
        Ok(())
    }
}

impl Ledger<MinterRole> {
    /// Whether `account` holds the minter role.
    #[must_use]
    pub fn is_minter(&self, account: AccountId) -> bool {
        self.access.is_minter(account)
    }

    /// Grant the minter role to `new_minter`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Unauthorized`] unless `caller` is a minter,
    /// [`LedgerError::InvalidMinter`] if `new_minter` is null or already a
    /// minter.
    pub fn add_minter(&mut self, caller: AccountId, new_minter: AccountId) -> Result<()> {
        self.access.add_minter(caller, new_minter)?;
        info!(%caller, minter = %new_minter, "minter added");
        self.emit(LedgerEvent::MinterAdded {
            account: new_minter,
        });
        Ok(())
    }

    /// Give up the caller's minter role.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NotAMinter`] if `caller` is not a minter.
    pub fn renounce_minter(&mut self, caller: AccountId) -> Result<()> {
        self.access.renounce_minter(caller)?;
        info!(minter = %caller, remaining = self.access.len(), "minter renounced");
        self.emit(LedgerEvent::MinterRemoved { account: caller });
        Ok(())
    }
}
