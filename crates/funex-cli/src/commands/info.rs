//! Token info command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::commands::load_token;
use crate::error::CliError;
use crate::output::{OutputFormat, TokenInfo};

/// Info command executor.
pub struct InfoCommand {
    state: PathBuf,
}

impl InfoCommand {
    /// Create a new info command reading `state`.
    #[must_use]
    pub fn new(state: impl AsRef<Path>) -> Self {
        Self {
            state: state.as_ref().to_path_buf(),
        }
    }

    /// Execute the info command.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be loaded or output fails.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let token = load_token(&self.state)?;
        format.write(writer, &TokenInfo::from_token(&token))
    }
}
