//! Scripted invocation command.
//!
//! Loads the token, applies each invocation of a JSON script in order,
//! saves the resulting state, and reports every call's events or error.
//! With `--stop-on-error` the run ends at the first rejection; calls
//! applied before it are kept.

use std::io::Write;
use std::path::{Path, PathBuf};

use funex_token::{Invocation, Token};
use tracing::{info, warn};

use crate::cli::ExecArgs;
use crate::commands::load_token;
use crate::error::CliError;
use crate::output::{CallOutcome, ErrorView, ExecReport, OutputFormat};

/// Exec command executor.
pub struct ExecCommand {
    state: PathBuf,
}

impl ExecCommand {
    /// Create a new exec command operating on `state`.
    #[must_use]
    pub fn new(state: impl AsRef<Path>) -> Self {
        Self {
            state: state.as_ref().to_path_buf(),
        }
    }

    /// Execute the script.
    ///
    /// # Errors
    ///
    /// Returns an error if the state or script cannot be loaded, the state
    /// cannot be saved, or a call was rejected under `--stop-on-error`.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &ExecArgs,
    ) -> Result<(), CliError> {
        let mut token = load_token(&self.state)?;
        let script = read_script(&args.script)?;

        let (report, abort) = run_script(&mut token, &script, args.stop_on_error);
        token.save_to(&self.state)?;
        info!(
            state = %self.state.display(),
            applied = report.applied,
            rejected = report.rejected,
            "script applied"
        );

        format.write(writer, &report)?;
        match abort {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Parse a script file into invocations.
///
/// # Errors
///
/// Returns [`CliError::Script`] if the file is unreadable or not a JSON
/// array of invocations.
pub fn read_script(path: &Path) -> Result<Vec<Invocation>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::Script {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| CliError::Script {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply `script` to `token`, collecting outcomes.
///
/// Returns the report and, when `stop_on_error` cut the run short, the
/// error to surface.
pub fn run_script(
    token: &mut Token,
    script: &[Invocation],
    stop_on_error: bool,
) -> (ExecReport, Option<CliError>) {
    let mut report = ExecReport::default();
    for (offset, invocation) in script.iter().enumerate() {
        let index = offset + 1;
        match token.apply(invocation) {
            Ok(events) => report.push(CallOutcome {
                index,
                caller: invocation.caller,
                op: invocation.call.name(),
                events,
                error: None,
            }),
            Err(e) => {
                warn!(index, op = invocation.call.name(), error = %e, "call rejected");
                report.push(CallOutcome {
                    index,
                    caller: invocation.caller,
                    op: invocation.call.name(),
                    events: Vec::new(),
                    error: Some(ErrorView::from(&e)),
                });
                if stop_on_error {
                    report.stopped = true;
                    return (report, Some(CliError::Aborted { index, source: e }));
                }
            }
        }
    }
    (report, None)
}
