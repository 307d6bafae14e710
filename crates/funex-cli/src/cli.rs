//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use funex_token::{AccountId, Preset};

/// Default state file, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = "funex-state.json";

/// Funex CLI - deploy and operate fungible-token ledgers.
#[derive(Parser, Debug, Clone)]
#[command(name = "funex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Ledger state file.
    #[arg(short, long, env = "FUNEX_STATE", default_value = DEFAULT_STATE_FILE)]
    pub state: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Deploy a new token into the state file.
    Deploy(DeployArgs),

    /// Show token metadata, supply and access control.
    Info,

    /// Show the balance of an account.
    Balance {
        /// Account to query.
        account: AccountId,
    },

    /// Show how much a spender may move out of an owner's balance.
    Allowance {
        /// Account granting the allowance.
        owner: AccountId,
        /// Account allowed to spend.
        spender: AccountId,
    },

    /// Apply a JSON script of invocations to the token.
    ///
    /// The script is an array of objects such as
    /// `{"caller": "0x..", "op": "transfer", "to": "0x..", "amount": "10"}`.
    Exec(ExecArgs),
}

/// Arguments for the deploy command.
#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    /// Built-in preset to deploy.
    #[arg(long, conflicts_with = "config", required_unless_present = "config")]
    pub preset: Option<Preset>,

    /// JSON token configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// First owner or minter, and holder of the genesis supply.
    #[arg(short, long)]
    pub initializer: AccountId,

    /// Overwrite an existing state file.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the exec command.
#[derive(Args, Debug, Clone)]
pub struct ExecArgs {
    /// Script file.
    pub script: PathBuf,

    /// Stop at the first rejected call instead of continuing.
    #[arg(long)]
    pub stop_on_error: bool,
}
