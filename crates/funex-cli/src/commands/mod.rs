//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`deploy`] - Create a token state file from a preset or config
//! - [`info`] - Token summary
//! - [`query`] - Balance and allowance lookups
//! - [`exec`] - Scripted invocations

pub mod deploy;
pub mod exec;
pub mod info;
pub mod query;

use std::path::Path;

use funex_token::Token;

use crate::error::CliError;

pub use deploy::DeployCommand;
pub use exec::ExecCommand;
pub use info::InfoCommand;
pub use query::{AllowanceCommand, BalanceCommand};

/// Load the token stored at `path`.
///
/// # Errors
///
/// Returns [`CliError::StateMissing`] if there is no file, or the store
/// error if it cannot be restored.
pub fn load_token(path: &Path) -> Result<Token, CliError> {
    if !path.exists() {
        return Err(CliError::StateMissing(path.to_path_buf()));
    }
    Ok(Token::load_from(path)?)
}
