//! CLI error types.

use std::path::PathBuf;

use funex_token::{LedgerError, StoreError};
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// No state file at the given path.
    #[error("no token state at '{}': run `funex deploy` first", .0.display())]
    StateMissing(PathBuf),

    /// Deploy would overwrite an existing state file.
    #[error("token state already exists at '{}': pass --force to overwrite", .0.display())]
    StateExists(PathBuf),

    /// Loading or saving state or configuration failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Script file could not be parsed.
    #[error("invalid script '{}': {message}", .path.display())]
    Script {
        /// Script path.
        path: PathBuf,
        /// Parse failure.
        message: String,
    },

    /// A scripted call was rejected and `--stop-on-error` was set.
    #[error("call #{index} rejected: {source}")]
    Aborted {
        /// Position of the call in the script.
        index: usize,
        /// Ledger error of the call.
        source: LedgerError,
    },

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
