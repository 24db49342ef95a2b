//! A-Frame CLI - Build WebVR scenes from the command line
//!
//! This is the main entry point for the aframe command-line interface.

mod cli;
mod commands;
mod output;
mod utils;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Bare `aframe` shows help and succeeds; explicit --help and
            // --version succeed; anything else is a usage error.
            match e.kind() {
                ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                | ErrorKind::MissingSubcommand => {
                    let _ = Cli::command().print_help();
                }
                _ => {
                    let _ = e.print();
                }
            }
            std::process::exit(parse_error_exit_code(e.kind()));
        }
    };
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Create(args) => commands::create::run(args).await,
        Commands::Build(args) => commands::build::run(args).await,
        Commands::Serve(args) => commands::serve::run(args).await,
        Commands::Deploy(args) => commands::deploy::run(args).await,
        Commands::Version(args) => commands::version::run(args),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

/// Exit code for an argument parse failure: help-style outcomes succeed,
/// real usage errors fail.
fn parse_error_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        | ErrorKind::MissingSubcommand => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_exits_zero() {
        let err = Cli::try_parse_from(["aframe"]).unwrap_err();
        assert_eq!(parse_error_exit_code(err.kind()), 0);
    }

    #[test]
    fn test_help_and_version_exit_zero() {
        for args in [["aframe", "--help"], ["aframe", "--version"]] {
            let err = Cli::try_parse_from(args).unwrap_err();
            assert_eq!(parse_error_exit_code(err.kind()), 0);
        }
    }

    #[test]
    fn test_unknown_command_exits_one() {
        let err = Cli::try_parse_from(["aframe", "frobnicate"]).unwrap_err();
        assert_eq!(parse_error_exit_code(err.kind()), 1);
    }
}
