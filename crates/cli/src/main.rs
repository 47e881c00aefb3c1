//! Feature switch command-line tool
//!
//! `feature-switch validate` scans the files selected by the configuration's
//! `filePatterns` and exits non-zero when it finds undefined or unused
//! feature switches. `feature-switch resolve` prints the switches enabled in
//! an environment.

mod cli;
mod commands;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::output::Printer;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "feature_switch=debug,feature_switch_core=debug,feature_switch_validator=debug"
    } else {
        "feature_switch=info,feature_switch_core=info,feature_switch_validator=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let printer = Printer::from_env();
    let result = match cli.command {
        Command::Validate(args) => commands::validate(args, printer)
            .await
            .map(|report| report.passed()),
        Command::Resolve(args) => commands::resolve(args, printer).await.map(|_| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            printer.error(&format!("Error: {:#}", err));
            ExitCode::FAILURE
        }
    }
}
