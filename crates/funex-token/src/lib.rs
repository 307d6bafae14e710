//! # funex-token
//!
//! Fungible-token ledger for the Funex token family.
//!
//! This crate provides:
//! - [`Ledger`] - balances, total supply and allowances with checked,
//!   all-or-nothing operations (transfer, approve, allowance adjustment,
//!   delegated transfer, mint, burn)
//! - [`SingleOwner`] and [`MinterRole`] - the two [`AccessControl`] models
//!   gating mints
//! - [`Token`] - runtime dispatch of serialized [`Invocation`]s to either
//!   ledger variant
//! - [`SharedLedger`] - a lock-guarded handle for multi-threaded hosts
//! - JSON snapshots and [`TokenConfig`] presets
//!
//! ## Token Details
//!
//! - **ERC20**: `FunexCoin` (`Funex`), 18 decimals, 50,000,000 tokens
//!   minted to the deployer, owner-gated minting
//! - **BEP20**: `Funex` (`Funex`), otherwise the same as ERC20
//! - **TRC20**: `Funex` (`FNX`), 6 decimals, zero genesis supply,
//!   minter-role gated minting
//!
//! Amounts are always raw base units.
//!
//! ## Example
//!
//! ```rust
//! use funex_token::{AccountId, Amount, Ledger, SingleOwner, TokenMetadata};
//!
//! # fn example() -> funex_token::Result<()> {
//! let owner = AccountId::new([1; 20]);
//! let alice = AccountId::new([2; 20]);
//!
//! let metadata = TokenMetadata::new("FunexCoin", "Funex", 18);
//! let mut ledger = Ledger::new(metadata, SingleOwner::new(owner)?);
//!
//! ledger.mint(owner, Amount::new(1_000_000))?;
//! ledger.transfer(owner, alice, Amount::new(1_000))?;
//! ledger.burn(alice, Amount::new(500))?;
//!
//! assert_eq!(ledger.balance_of(owner), Amount::new(999_000));
//! assert_eq!(ledger.total_supply(), Amount::new(999_500));
//! assert_eq!(ledger.drain_events().len(), 3);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
pub mod account;
pub mod amount;
pub mod config;
pub mod error;
pub mod event;
pub mod host;
pub mod ledger;
pub mod shared;
pub mod snapshot;

pub use access::{AccessControl, AccessModel, MinterRole, Ownership, SingleOwner};
pub use account::{AccountId, ACCOUNT_ID_LEN};
pub use amount::Amount;
pub use config::{Preset, TokenConfig, FUNEX_GENESIS_SUPPLY};
pub use error::{ErrorCategory, LedgerError, ParseError, Result, StoreError};
pub use event::LedgerEvent;
pub use host::{Call, Invocation, Token, TokenSnapshot};
pub use ledger::{Ledger, TokenMetadata};
pub use shared::SharedLedger;
pub use snapshot::{AllowanceEntry, LedgerSnapshot, SNAPSHOT_VERSION};
