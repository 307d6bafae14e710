//! # funex-cli
//!
//! Funex command-line interface.
//!
//! Provides commands for:
//! - Deploying a token from a preset or JSON config
//! - Inspecting metadata, supply, balances and allowances
//! - Applying scripted invocations as any caller
//!
//! # Architecture
//!
//! Token state lives in a JSON snapshot file (`--state`, default
//! `funex-state.json`). Every command loads it through
//! [`funex_token::Token::load_from`]; `deploy` and `exec` write it back.
//!
//! ```text
//! ┌───────────┐   load / save   ┌──────────────────┐
//! │ funex-cli │◄───────────────►│ funex-state.json │
//! └───────────┘                 └──────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, DeployArgs, ExecArgs, Format};
pub use error::CliError;
pub use output::OutputFormat;
