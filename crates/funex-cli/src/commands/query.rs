//! Balance and allowance lookups.

use std::io::Write;
use std::path::{Path, PathBuf};

use funex_token::AccountId;

use crate::commands::load_token;
use crate::error::CliError;
use crate::output::{AllowanceView, BalanceView, OutputFormat};

/// Balance command executor.
pub struct BalanceCommand {
    state: PathBuf,
}

impl BalanceCommand {
    /// Create a new balance command reading `state`.
    #[must_use]
    pub fn new(state: impl AsRef<Path>) -> Self {
        Self {
            state: state.as_ref().to_path_buf(),
        }
    }

    /// Execute the balance command.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be loaded or output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        account: AccountId,
    ) -> Result<(), CliError> {
        let token = load_token(&self.state)?;
        let view = BalanceView {
            account,
            balance: token.balance_of(account),
        };
        format.write(writer, &view)
    }
}

/// Allowance command executor.
pub struct AllowanceCommand {
    state: PathBuf,
}

impl AllowanceCommand {
    /// Create a new allowance command reading `state`.
    #[must_use]
    pub fn new(state: impl AsRef<Path>) -> Self {
        Self {
            state: state.as_ref().to_path_buf(),
        }
    }

    /// Execute the allowance command.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be loaded or output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        owner: AccountId,
        spender: AccountId,
    ) -> Result<(), CliError> {
        let token = load_token(&self.state)?;
        let view = AllowanceView {
            owner,
            spender,
            allowance: token.allowance(owner, spender),
        };
        format.write(writer, &view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use funex_token::{Preset, Token};
    use tempfile::TempDir;

    #[test]
    fn balance_of_genesis_holder() {
        let dir = TempDir::new().expect("tempdir");
        let state = dir.path().join("state.json");
        let holder = AccountId::new([1; 20]);
        let (token, _) = Token::deploy(&Preset::Erc20.config(), holder).expect("deploy");
        token.save_to(&state).expect("save");

        let mut out = Vec::new();
        BalanceCommand::new(&state)
            .execute(&mut out, &OutputFormat::new(Format::Json), holder)
            .expect("balance");
        let view: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(view["balance"], "50000000000000000000000000");
    }

    #[test]
    fn missing_state_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        let err = AllowanceCommand::new(dir.path().join("none.json"))
            .execute(
                &mut Vec::new(),
                &OutputFormat::default(),
                AccountId::new([1; 20]),
                AccountId::new([2; 20]),
            )
            .expect_err("no state");
        assert!(matches!(err, CliError::StateMissing(_)));
    }
}
