//! Funex CLI binary entrypoint.
//!
//! This is the main entry point for the `funex` command-line tool.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use funex_cli::cli::{Cli, Commands};
use funex_cli::commands::{
    AllowanceCommand, BalanceCommand, DeployCommand, ExecCommand, InfoCommand,
};
use funex_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), funex_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Deploy(args) => {
            let cmd = DeployCommand::new(&cli.state);
            cmd.execute(&mut stdout, &format, &args)?;
        }
        Commands::Info => {
            let cmd = InfoCommand::new(&cli.state);
            cmd.execute(&mut stdout, &format)?;
        }
        Commands::Balance { account } => {
            let cmd = BalanceCommand::new(&cli.state);
            cmd.execute(&mut stdout, &format, account)?;
        }
        Commands::Allowance { owner, spender } => {
            let cmd = AllowanceCommand::new(&cli.state);
            cmd.execute(&mut stdout, &format, owner, spender)?;
        }
        Commands::Exec(args) => {
            let cmd = ExecCommand::new(&cli.state);
            cmd.execute(&mut stdout, &format, &args)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use funex_cli::cli::Format;
    use funex_token::{AccountId, Preset};

    #[test]
    fn cli_parses_info() {
        let cli = Cli::parse_from(["funex", "info"]);
        assert!(matches!(cli.command, Commands::Info));
        assert_eq!(cli.state, std::path::PathBuf::from("funex-state.json"));
    }

    #[test]
    fn cli_parses_deploy_preset() {
        let cli = Cli::parse_from([
            "funex",
            "deploy",
            "--preset",
            "bep20",
            "--initializer",
            "0x0101010101010101010101010101010101010101",
        ]);
        match cli.command {
            Commands::Deploy(args) => {
                assert_eq!(args.preset, Some(Preset::Bep20));
                assert_eq!(args.initializer, AccountId::new([1; 20]));
                assert!(!args.force);
            }
            _ => panic!("expected deploy command"),
        }
    }

    #[test]
    fn cli_deploy_requires_a_source() {
        let result = Cli::try_parse_from([
            "funex",
            "deploy",
            "--initializer",
            "0x0101010101010101010101010101010101010101",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_rejects_bad_account() {
        let result = Cli::try_parse_from(["funex", "balance", "0xnothex"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_respects_format_and_state_flags() {
        let cli = Cli::parse_from(["funex", "--format", "json", "-s", "/tmp/x.json", "info"]);
        assert_eq!(cli.format, Format::Json);
        assert_eq!(cli.state, std::path::PathBuf::from("/tmp/x.json"));
    }

    #[test]
    fn run_info_without_state_fails() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let state = dir.path().join("missing.json");
        let cli = Cli::parse_from(["funex", "-s", state.to_str().expect("utf8"), "info"]);
        assert!(run(cli).is_err());
    }
}
