//! Runtime dispatch of serialized calls.
//!
//! A host receives `(caller, call)` pairs without knowing statically which
//! access model a token was deployed with. [`Token`] wraps either ledger
//! variant and routes each [`Call`] to the matching operation; calls that
//! only one variant offers fail with [`LedgerError::UnsupportedCall`] on the
//! other.
//!
//! ```
//! use funex_token::{AccountId, Call, Invocation, Preset, Token};
//!
//! let owner: AccountId = "0x1111111111111111111111111111111111111111".parse().unwrap();
//! let (mut token, genesis) = Token::deploy(&Preset::Trc20.config(), owner).unwrap();
//! assert!(genesis.is_empty());
//!
//! let events = token
//!     .apply(&Invocation::new(owner, Call::Mint { amount: 5u64.into() }))
//!     .unwrap();
//! assert_eq!(events.len(), 1);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::access::{AccessControl, AccessModel, MinterRole, SingleOwner};
use crate::account::AccountId;
use crate::amount::Amount;
use crate::config::TokenConfig;
use crate::error::{LedgerError, Result, StoreError};
use crate::event::LedgerEvent;
use crate::ledger::{Ledger, TokenMetadata};
use crate::snapshot::{read_json, write_json, LedgerSnapshot};

/// A mutating operation, minus the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    /// [`Ledger::transfer`].
    Transfer {
        /// Recipient.
        to: AccountId,
        /// Amount to move.
        amount: Amount,
    },
    /// [`Ledger::approve`].
    Approve {
        /// Spender.
        spender: AccountId,
        /// New allowance.
        amount: Amount,
    },
    /// [`Ledger::increase_allowance`].
    IncreaseAllowance {
        /// Spender.
        spender: AccountId,
        /// Increase.
        delta: Amount,
    },
    /// [`Ledger::decrease_allowance`].
    DecreaseAllowance {
        /// Spender.
        spender: AccountId,
        /// Decrease.
        delta: Amount,
    },
    /// [`Ledger::transfer_from`].
    TransferFrom {
        /// Account whose funds are spent.
        from: AccountId,
        /// Recipient.
        to: AccountId,
        /// Amount to move.
        amount: Amount,
    },
    /// [`Ledger::mint`].
    Mint {
        /// Amount to mint to the caller.
        amount: Amount,
    },
    /// [`Ledger::mint_to`].
    MintTo {
        /// Beneficiary.
        to: AccountId,
        /// Amount to mint.
        amount: Amount,
    },
    /// [`Ledger::burn`].
    Burn {
        /// Amount to destroy.
        amount: Amount,
    },
    /// Single-owner only: hand over ownership.
    TransferOwnership {
        /// New owner.
        new_owner: AccountId,
    },
    /// Single-owner only: give up ownership.
    RenounceOwnership,
    /// Minter-role only: grant the role.
    AddMinter {
        /// New minter.
        account: AccountId,
    },
    /// Minter-role only: give up the caller's role.
    RenounceMinter,
}

impl Call {
    /// Operation name as used in the `op` tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::Approve { .. } => "approve",
            Self::IncreaseAllowance { .. } => "increase_allowance",
            Self::DecreaseAllowance { .. } => "decrease_allowance",
            Self::TransferFrom { .. } => "transfer_from",
            Self::Mint { .. } => "mint",
            Self::MintTo { .. } => "mint_to",
            Self::Burn { .. } => "burn",
            Self::TransferOwnership { .. } => "transfer_ownership",
            Self::RenounceOwnership => "renounce_ownership",
            Self::AddMinter { .. } => "add_minter",
            Self::RenounceMinter => "renounce_minter",
        }
    }
}

/// A call together with the account making it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Authenticated caller, supplied by the host.
    pub caller: AccountId,
    /// The operation.
    #[serde(flatten)]
    pub call: Call,
}

impl Invocation {
    /// Create an invocation.
    #[must_use]
    pub const fn new(caller: AccountId, call: Call) -> Self {
        Self { caller, call }
    }
}

/// A deployed token of either access model.
#[derive(Debug, Clone)]
pub enum Token {
    /// Single-owner token.
    Owned(Ledger<SingleOwner>),
    /// Minter-role token.
    Minter(Ledger<MinterRole>),
}

/// Persisted form of a [`Token`], tagged with its access model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "kebab-case")]
pub enum TokenSnapshot {
    /// Single-owner ledger state.
    SingleOwner(LedgerSnapshot<SingleOwner>),
    /// Minter-role ledger state.
    MinterRole(LedgerSnapshot<MinterRole>),
}

impl Token {
    /// Deploy a token from `config` with `initializer` as first owner or
    /// minter and genesis holder. Returns the token and its genesis events.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or `initializer` is null.
    pub fn deploy(
        config: &TokenConfig,
        initializer: AccountId,
    ) -> std::result::Result<(Self, Vec<LedgerEvent>), StoreError> {
        config.validate()?;
        let metadata = config.metadata();
        let supply = config.initial_supply;
        let mut token = match config.access {
            AccessModel::SingleOwner => Self::Owned(Ledger::with_initial_supply(
                metadata,
                SingleOwner::new(initializer)?,
                initializer,
                supply,
            )?),
            AccessModel::MinterRole => Self::Minter(Ledger::with_initial_supply(
                metadata,
                MinterRole::new(initializer)?,
                initializer,
                supply,
            )?),
        };
        let events = token.drain_events();
        info!(
            symbol = %config.symbol,
            model = %config.access,
            %initializer,
            "token deployed"
        );
        Ok((token, events))
    }

    /// Execute one invocation and return the events it emitted.
    ///
    /// # Errors
    ///
    /// Returns the ledger error of the call; state is left unchanged.
    pub fn apply(&mut self, invocation: &Invocation) -> Result<Vec<LedgerEvent>> {
        let caller = invocation.caller;
        let call = &invocation.call;
        let outcome = match self {
            Self::Owned(ledger) => match *call {
                Call::TransferOwnership { new_owner } => {
                    ledger.transfer_ownership(caller, new_owner)
                }
                Call::RenounceOwnership => ledger.renounce_ownership(caller),
                _ => apply_common(ledger, caller, call),
            },
            Self::Minter(ledger) => match *call {
                Call::AddMinter { account } => ledger.add_minter(caller, account),
                Call::RenounceMinter => ledger.renounce_minter(caller),
                _ => apply_common(ledger, caller, call),
            },
        };

        match outcome {
            Ok(()) => {
                let events = self.drain_events();
                debug!(%caller, op = call.name(), events = events.len(), "call applied");
                Ok(events)
            }
            Err(e) => {
                debug!(%caller, op = call.name(), error = %e, "call rejected");
                Err(e)
            }
        }
    }

    fn drain_events(&mut self) -> Vec<LedgerEvent> {
        match self {
            Self::Owned(ledger) => ledger.drain_events(),
            Self::Minter(ledger) => ledger.drain_events(),
        }
    }

    /// Access model of this token.
    #[must_use]
    pub const fn model(&self) -> AccessModel {
        match self {
            Self::Owned(_) => AccessModel::SingleOwner,
            Self::Minter(_) => AccessModel::MinterRole,
        }
    }

    /// Token metadata.
    #[must_use]
    pub const fn metadata(&self) -> &TokenMetadata {
        match self {
            Self::Owned(ledger) => ledger.metadata(),
            Self::Minter(ledger) => ledger.metadata(),
        }
    }

    /// Total supply.
    #[must_use]
    pub const fn total_supply(&self) -> Amount {
        match self {
            Self::Owned(ledger) => ledger.total_supply(),
            Self::Minter(ledger) => ledger.total_supply(),
        }
    }

    /// Balance of `account`.
    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> Amount {
        match self {
            Self::Owned(ledger) => ledger.balance_of(account),
            Self::Minter(ledger) => ledger.balance_of(account),
        }
    }

    /// Allowance of `spender` over `owner`'s funds.
    #[must_use]
    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        match self {
            Self::Owned(ledger) => ledger.allowance(owner, spender),
            Self::Minter(ledger) => ledger.allowance(owner, spender),
        }
    }

    /// Whether `caller` may mint.
    #[must_use]
    pub fn can_mint(&self, caller: AccountId) -> bool {
        match self {
            Self::Owned(ledger) => ledger.can_mint(caller),
            Self::Minter(ledger) => ledger.can_mint(caller),
        }
    }

    /// Owner of a single-owner token; `None` once renounced or for
    /// minter-role tokens.
    #[must_use]
    pub const fn owner(&self) -> Option<AccountId> {
        match self {
            Self::Owned(ledger) => ledger.owner(),
            Self::Minter(_) => None,
        }
    }

    /// Minters of a minter-role token; empty for single-owner tokens.
    #[must_use]
    pub fn minters(&self) -> Vec<AccountId> {
        match self {
            Self::Owned(_) => Vec::new(),
            Self::Minter(ledger) => ledger.access().minters().collect(),
        }
    }

    /// Accounts with a recorded balance, in identifier order.
    #[must_use]
    pub fn holders(&self) -> Vec<(AccountId, Amount)> {
        let mut holders: Vec<_> = match self {
            Self::Owned(ledger) => ledger.balances().collect(),
            Self::Minter(ledger) => ledger.balances().collect(),
        };
        holders.sort();
        holders
    }

    /// Whether balances sum to the total supply.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        match self {
            Self::Owned(ledger) => ledger.is_conserved(),
            Self::Minter(ledger) => ledger.is_conserved(),
        }
    }

    /// Capture the current state.
    #[must_use]
    pub fn snapshot(&self) -> TokenSnapshot {
        match self {
            Self::Owned(ledger) => TokenSnapshot::SingleOwner(ledger.snapshot()),
            Self::Minter(ledger) => TokenSnapshot::MinterRole(ledger.snapshot()),
        }
    }

    /// Rebuild a token from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the snapshot violates a ledger
    /// invariant.
    pub fn restore(snapshot: TokenSnapshot) -> std::result::Result<Self, StoreError> {
        Ok(match snapshot {
            TokenSnapshot::SingleOwner(s) => Self::Owned(Ledger::restore(s)?),
            TokenSnapshot::MinterRole(s) => Self::Minter(Ledger::restore(s)?),
        })
    }

    /// Write the token state to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_to(&self, path: impl AsRef<Path>) -> std::result::Result<(), StoreError> {
        write_json(path.as_ref(), &self.snapshot())
    }

    /// Load token state from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed, or corrupt.
    pub fn load_from(path: impl AsRef<Path>) -> std::result::Result<Self, StoreError> {
        Self::restore(read_json(path.as_ref())?)
    }
}

fn apply_common<A: AccessControl>(
    ledger: &mut Ledger<A>,
    caller: AccountId,
    call: &Call,
) -> Result<()> {
    match *call {
        Call::Transfer { to, amount } => ledger.transfer(caller, to, amount),
        Call::Approve { spender, amount } => ledger.approve(caller, spender, amount),
        Call::IncreaseAllowance { spender, delta } => {
            ledger.increase_allowance(caller, spender, delta)
        }
        Call::DecreaseAllowance { spender, delta } => {
            ledger.decrease_allowance(caller, spender, delta)
        }
        Call::TransferFrom { from, to, amount } => ledger.transfer_from(caller, from, to, amount),
        Call::Mint { amount } => ledger.mint(caller, amount),
        Call::MintTo { to, amount } => ledger.mint_to(caller, to, amount),
        Call::Burn { amount } => ledger.burn(caller, amount),
        Call::TransferOwnership { .. }
        | Call::RenounceOwnership
        | Call::AddMinter { .. }
        | Call::RenounceMinter => Err(LedgerError::UnsupportedCall {
            call: call.name(),
            model: ledger.access().model(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preset, FUNEX_GENESIS_SUPPLY};
    use tempfile::TempDir;
    use test_case::test_case;

    fn account(byte: u8) -> AccountId {
        AccountId::new([byte; 20])
    }

    fn invoke(caller: u8, call: Call) -> Invocation {
        Invocation::new(account(caller), call)
    }

    #[test]
    fn deploy_erc20_credits_genesis() {
        let (token, events) = Token::deploy(&Preset::Erc20.config(), account(1)).expect("deploy");
        assert_eq!(token.model(), AccessModel::SingleOwner);
        assert_eq!(token.total_supply(), FUNEX_GENESIS_SUPPLY);
        assert_eq!(token.balance_of(account(1)), FUNEX_GENESIS_SUPPLY);
        assert_eq!(token.owner(), Some(account(1)));
        assert_eq!(
            events,
            vec![LedgerEvent::Transfer {
                from: AccountId::NULL,
                to: account(1),
                amount: FUNEX_GENESIS_SUPPLY
            }]
        );
    }

    #[test]
    fn deploy_rejects_null_initializer() {
        let err = Token::deploy(&Preset::Trc20.config(), AccountId::NULL).expect_err("null");
        assert!(matches!(
            err,
            StoreError::Ledger(LedgerError::InvalidMinter { .. })
        ));
    }

    #[test]
    fn deploy_rejects_invalid_config() {
        let mut config = Preset::Erc20.config();
        config.name = String::new();
        assert!(matches!(
            Token::deploy(&config, account(1)),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn mint_transfer_burn_scenario() {
        let (mut token, _) = Token::deploy(&Preset::Trc20.config(), account(1)).expect("deploy");
        token
            .apply(&invoke(1, Call::Mint { amount: Amount::new(1_000_000) }))
            .expect("mint");
        token
            .apply(&invoke(
                1,
                Call::Transfer {
                    to: account(2),
                    amount: Amount::new(1_000),
                },
            ))
            .expect("transfer");
        let events = token
            .apply(&invoke(2, Call::Burn { amount: Amount::new(500) }))
            .expect("burn");

        assert_eq!(token.balance_of(account(1)), Amount::new(999_000));
        assert_eq!(token.balance_of(account(2)), Amount::new(500));
        assert_eq!(token.total_supply(), Amount::new(999_500));
        assert_eq!(
            events,
            vec![LedgerEvent::Transfer {
                from: account(2),
                to: AccountId::NULL,
                amount: Amount::new(500)
            }]
        );
    }

    #[test_case(Preset::Erc20, Call::AddMinter { account: AccountId::new([2; 20]) } ; "add minter on owned")]
    #[test_case(Preset::Erc20, Call::RenounceMinter ; "renounce minter on owned")]
    #[test_case(Preset::Trc20, Call::RenounceOwnership ; "renounce ownership on minter")]
    #[test_case(Preset::Trc20, Call::TransferOwnership { new_owner: AccountId::new([2; 20]) } ; "transfer ownership on minter")]
    fn variant_calls_are_unsupported_elsewhere(preset: Preset, call: Call) {
        let (mut token, _) = Token::deploy(&preset.config(), account(1)).expect("deploy");
        let before = token.snapshot();
        let err = token
            .apply(&Invocation::new(account(1), call))
            .expect_err("unsupported");
        assert_eq!(err.category(), crate::error::ErrorCategory::Dispatch);
        assert_eq!(token.snapshot(), before);
    }

    #[test]
    fn failed_call_returns_error_and_no_events() {
        let (mut token, _) = Token::deploy(&Preset::Bep20.config(), account(1)).expect("deploy");
        let err = token
            .apply(&invoke(2, Call::Mint { amount: Amount::new(1) }))
            .expect_err("unauthorized");
        assert_eq!(err, LedgerError::unauthorized(account(2)));
        let events = token
            .apply(&invoke(1, Call::Approve {
                spender: account(2),
                amount: Amount::new(3),
            }))
            .expect("approve");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn minter_admin_through_dispatch() {
        let (mut token, _) = Token::deploy(&Preset::Trc20.config(), account(1)).expect("deploy");
        token
            .apply(&invoke(1, Call::AddMinter { account: account(2) }))
            .expect("add");
        assert_eq!(token.minters(), vec![account(1), account(2)]);
        token.apply(&invoke(1, Call::RenounceMinter)).expect("renounce");
        assert!(!token.can_mint(account(1)));
        assert!(token.can_mint(account(2)));
        assert_eq!(token.owner(), None);
    }

    #[test]
    fn invocation_json_shape() {
        let json = format!(
            r#"{{"caller":"{}","op":"transfer_from","from":"{}","to":"{}","amount":"60"}}"#,
            account(2),
            account(1),
            account(3)
        );
        let invocation: Invocation = serde_json::from_str(&json).expect("parse");
        assert_eq!(
            invocation,
            invoke(
                2,
                Call::TransferFrom {
                    from: account(1),
                    to: account(3),
                    amount: Amount::new(60),
                }
            )
        );

        let unit: Invocation = serde_json::from_str(&format!(
            r#"{{"caller":"{}","op":"renounce_ownership"}}"#,
            account(1)
        ))
        .expect("parse unit call");
        assert_eq!(unit.call, Call::RenounceOwnership);
    }

    #[test]
    fn token_file_round_trip_keeps_model() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("token.json");

        let (mut token, _) = Token::deploy(&Preset::Trc20.config(), account(1)).expect("deploy");
        token
            .apply(&invoke(1, Call::MintTo { to: account(4), amount: Amount::new(9) }))
            .expect("mint");
        token.save_to(&path).expect("save");

        let raw = std::fs::read_to_string(&path).expect("read");
        assert!(raw.contains(r#""model": "minter-role""#));

        let loaded = Token::load_from(&path).expect("load");
        assert_eq!(loaded.model(), AccessModel::MinterRole);
        assert_eq!(loaded.snapshot(), token.snapshot());
        assert_eq!(loaded.holders(), vec![(account(4), Amount::new(9))]);
        assert!(loaded.is_conserved());
    }
}
