//! Deploy command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use funex_token::{Token, TokenConfig};
use tracing::info;

use crate::cli::DeployArgs;
use crate::error::CliError;
use crate::output::{DeployReport, OutputFormat};

/// Deploy command executor.
pub struct DeployCommand {
    state: PathBuf,
}

impl DeployCommand {
    /// Create a new deploy command writing to `state`.
    #[must_use]
    pub fn new(state: impl AsRef<Path>) -> Self {
        Self {
            state: state.as_ref().to_path_buf(),
        }
    }

    /// Execute the deploy command.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file exists without `--force`, the
    /// configuration is invalid, or the state cannot be written.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &DeployArgs,
    ) -> Result<(), CliError> {
        if self.state.exists() && !args.force {
            return Err(CliError::StateExists(self.state.clone()));
        }

        let config = Self::resolve_config(args)?;
        let (token, events) = Token::deploy(&config, args.initializer)?;
        token.save_to(&self.state)?;
        info!(state = %self.state.display(), symbol = %config.symbol, "state written");

        format.write(writer, &DeployReport::new(&self.state, &token, events))
    }

    fn resolve_config(args: &DeployArgs) -> Result<TokenConfig, CliError> {
        match (&args.preset, &args.config) {
            (_, Some(path)) => Ok(TokenConfig::from_file(path)?),
            (Some(preset), None) => Ok(preset.config()),
            // clap enforces one of the two
            (None, None) => Err(CliError::InvalidArgument(
                "either --preset or --config is required".to_string(),
            )),
        }
    }
}
