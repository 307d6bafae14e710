//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;
use std::path::Path;

use funex_token::{AccessModel, AccountId, Amount, LedgerError, LedgerEvent, Token};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Renders command results in the format chosen with `--format`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Render with `format`.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write `view` as pretty JSON or as its table.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Format`] if the view does not serialize, or
    /// [`CliError::Io`] if the writer fails.
    pub fn write<W, T>(&self, writer: &mut W, view: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        if self.format == Format::Table {
            return view.write_table(writer);
        }
        serde_json::to_writer_pretty(&mut *writer, view)
            .map_err(|e| CliError::Format(format!("cannot encode view as JSON: {e}")))?;
        writeln!(writer)?;
        Ok(())
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// One-line rendering of an event.
#[must_use]
pub fn describe_event(event: &LedgerEvent) -> String {
    match event {
        LedgerEvent::Transfer { from, to, amount } if from.is_null() => {
            format!("Transfer  mint {amount} -> {to}")
        }
        LedgerEvent::Transfer { from, to, amount } if to.is_null() => {
            format!("Transfer  burn {amount} <- {from}")
        }
        LedgerEvent::Transfer { from, to, amount } => {
            format!("Transfer  {from} -> {to}: {amount}")
        }
        LedgerEvent::Approval {
            owner,
            spender,
            amount,
        } => format!("Approval  {owner} allows {spender}: {amount}"),
        LedgerEvent::OwnershipTransferred { previous, new } => {
            format!("OwnershipTransferred  {previous} -> {new}")
        }
        LedgerEvent::MinterAdded { account } => format!("MinterAdded  {account}"),
        LedgerEvent::MinterRemoved { account } => format!("MinterRemoved  {account}"),
    }
}

fn write_events<W: Write>(writer: &mut W, events: &[LedgerEvent]) -> Result<(), CliError> {
    for event in events {
        writeln!(writer, "  {}", describe_event(event))?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────
// Token info
// ─────────────────────────────────────────────────────────────

/// Token summary.
#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Display decimals.
    pub decimals: u8,
    /// Access-control model.
    pub model: AccessModel,
    /// Total supply in base units.
    pub total_supply: Amount,
    /// Owner (single-owner tokens; null once renounced).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<AccountId>,
    /// Minters (minter-role tokens).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub minters: Vec<AccountId>,
    /// Number of accounts with a recorded balance.
    pub holders: usize,
}

impl TokenInfo {
    /// Summarize a token.
    #[must_use]
    pub fn from_token(token: &Token) -> Self {
        let metadata = token.metadata();
        let owner = match token.model() {
            AccessModel::SingleOwner => Some(token.owner().unwrap_or(AccountId::NULL)),
            AccessModel::MinterRole => None,
        };
        Self {
            name: metadata.name().to_string(),
            symbol: metadata.symbol().to_string(),
            decimals: metadata.decimals(),
            model: token.model(),
            total_supply: token.total_supply(),
            owner,
            minters: token.minters(),
            holders: token.holders().len(),
        }
    }
}

impl TableDisplay for TokenInfo {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{} ({})", self.name, self.symbol)?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Decimals:       {}", self.decimals)?;
        writeln!(writer, "Access model:   {}", self.model)?;
        writeln!(writer, "Total supply:   {}", self.total_supply)?;
        writeln!(writer, "Holders:        {}", self.holders)?;
        if let Some(owner) = self.owner {
            if owner.is_null() {
                writeln!(writer, "Owner:          (renounced)")?;
            } else {
                writeln!(writer, "Owner:          {owner}")?;
            }
        }
        if self.model == AccessModel::MinterRole {
            if self.minters.is_empty() {
                writeln!(writer, "Minters:        (none)")?;
            } else {
                writeln!(writer, "Minters:")?;
                for minter in &self.minters {
                    writeln!(writer, "  {minter}")?;
                }
            }
        }
        Ok(())
    }
}

/// Result of a deployment.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    /// Where the state was written.
    pub state: String,
    /// Deployed token.
    pub token: TokenInfo,
    /// Genesis events.
    pub events: Vec<LedgerEvent>,
}

impl DeployReport {
    /// Build a report for a freshly deployed token.
    #[must_use]
    pub fn new(state: &Path, token: &Token, events: Vec<LedgerEvent>) -> Self {
        Self {
            state: state.display().to_string(),
            token: TokenInfo::from_token(token),
            events,
        }
    }
}

impl TableDisplay for DeployReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Deployed to {}", self.state)?;
        writeln!(writer)?;
        self.token.write_table(writer)?;
        if !self.events.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Events")?;
            write_events(writer, &self.events)?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────────

/// Balance query result.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceView {
    /// Queried account.
    pub account: AccountId,
    /// Balance in base units.
    pub balance: Amount,
}

impl TableDisplay for BalanceView {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{}  {}", self.account, self.balance)?;
        Ok(())
    }
}

/// Allowance query result.
#[derive(Debug, Clone, Serialize)]
pub struct AllowanceView {
    /// Account granting the allowance.
    pub owner: AccountId,
    /// Account allowed to spend.
    pub spender: AccountId,
    /// Remaining allowance.
    pub allowance: Amount,
}

impl TableDisplay for AllowanceView {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{} -> {}  {}", self.owner, self.spender, self.allowance)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
// Script execution
// ─────────────────────────────────────────────────────────────

/// Serializable form of a rejected call's error.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorView {
    /// Error kind, e.g. `InsufficientBalance`.
    pub kind: &'static str,
    /// Error category.
    pub category: String,
    /// Human-readable message.
    pub message: String,
}

impl From<&LedgerError> for ErrorView {
    fn from(err: &LedgerError) -> Self {
        Self {
            kind: err.kind(),
            category: err.category().to_string(),
            message: err.to_string(),
        }
    }
}

/// Outcome of one scripted call.
#[derive(Debug, Clone, Serialize)]
pub struct CallOutcome {
    /// Position in the script, starting at 1.
    pub index: usize,
    /// Calling account.
    pub caller: AccountId,
    /// Operation name.
    pub op: &'static str,
    /// Events emitted on success.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<LedgerEvent>,
    /// Error on rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorView>,
}

impl CallOutcome {
    /// Whether the call succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a script run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecReport {
    /// Calls that succeeded.
    pub applied: usize,
    /// Calls that were rejected.
    pub rejected: usize,
    /// Whether the run stopped early.
    pub stopped: bool,
    /// Per-call outcomes in script order.
    pub outcomes: Vec<CallOutcome>,
}

impl ExecReport {
    /// Record one outcome.
    pub fn push(&mut self, outcome: CallOutcome) {
        if outcome.is_ok() {
            self.applied += 1;
        } else {
            self.rejected += 1;
        }
        self.outcomes.push(outcome);
    }
}

impl TableDisplay for ExecReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.outcomes.is_empty() {
            writeln!(writer, "Script contained no calls")?;
            return Ok(());
        }

        writeln!(writer, "{:>4}  {:<20}  {:<42}  {}", "#", "OP", "CALLER", "RESULT")?;
        writeln!(writer, "{}", "─".repeat(90))?;
        for outcome in &self.outcomes {
            let result = match &outcome.error {
                None => "ok".to_string(),
                Some(err) => err.kind.to_string(),
            };
            writeln!(
                writer,
                "{:>4}  {:<20}  {:<42}  {}",
                outcome.index,
                outcome.op,
                outcome.caller.to_string(),
                result
            )?;
            if let Some(err) = &outcome.error {
                writeln!(writer, "  {}", err.message)?;
            }
            write_events(writer, &outcome.events)?;
        }

        writeln!(writer)?;
        write!(
            writer,
            "Applied: {}  Rejected: {}",
            self.applied, self.rejected
        )?;
        if self.stopped {
            write!(writer, "  (stopped at first rejection)")?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funex_token::{AccountId, Preset};

    fn account(byte: u8) -> AccountId {
        AccountId::new([byte; 20])
    }

    fn render<T: Serialize + TableDisplay>(format: Format, view: &T) -> String {
        let mut out = Vec::new();
        OutputFormat::new(format).write(&mut out, view).expect("render");
        String::from_utf8(out).expect("utf-8")
    }

    #[test]
    fn output_format_json() {
        let view = BalanceView {
            account: account(1),
            balance: Amount::new(42),
        };
        let output = render(Format::Json, &view);
        let parsed: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(parsed["balance"], "42");
    }

    #[test]
    fn output_format_table() {
        let view = AllowanceView {
            owner: account(1),
            spender: account(2),
            allowance: Amount::new(7),
        };
        let mut out = Vec::new();
        OutputFormat::default().write(&mut out, &view).expect("render");
        let output = String::from_utf8(out).expect("utf-8");
        assert!(output.contains(&account(2).to_string()));
        assert!(output.trim_end().ends_with('7'));
    }

    #[test]
    fn token_info_for_each_model() {
        let (owned, _) = Token::deploy(&Preset::Erc20.config(), account(1)).expect("deploy");
        let info = TokenInfo::from_token(&owned);
        assert_eq!(info.owner, Some(account(1)));
        assert!(info.minters.is_empty());
        let table = render(Format::Table, &info);
        assert!(table.contains("FunexCoin (Funex)"));
        assert!(table.contains("single-owner"));

        let (minter, _) = Token::deploy(&Preset::Trc20.config(), account(1)).expect("deploy");
        let info = TokenInfo::from_token(&minter);
        assert_eq!(info.owner, None);
        assert_eq!(info.minters, vec![account(1)]);
        let json = render(Format::Json, &info);
        assert!(!json.contains("\"owner\""));
    }

    #[test]
    fn describe_mint_and_burn() {
        let mint = LedgerEvent::Transfer {
            from: AccountId::NULL,
            to: account(1),
            amount: Amount::new(5),
        };
        assert!(describe_event(&mint).contains("mint 5"));
        let burn = LedgerEvent::Transfer {
            from: account(1),
            to: AccountId::NULL,
            amount: Amount::new(5),
        };
        assert!(describe_event(&burn).contains("burn 5"));
    }

    #[test]
    fn exec_report_counts() {
        let mut report = ExecReport::default();
        report.push(CallOutcome {
            index: 1,
            caller: account(1),
            op: "mint",
            events: Vec::new(),
            error: None,
        });
        report.push(CallOutcome {
            index: 2,
            caller: account(2),
            op: "mint",
            events: Vec::new(),
            error: Some(ErrorView::from(&LedgerError::unauthorized(account(2)))),
        });
        assert_eq!((report.applied, report.rejected), (1, 1));
        let table = render(Format::Table, &report);
        assert!(table.contains("Unauthorized"));
        assert!(table.contains("Applied: 1  Rejected: 1"));
    }
}
