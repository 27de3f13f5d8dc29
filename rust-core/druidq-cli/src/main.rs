// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! druidq: run templated SQL against Druid with a local result cache.
//!
//! ```text
//! druidq "SELECT COUNT(*) FROM events"
//! druidq -v reports/daily.sql
//! druidq -n -e 'wc -l' "SELECT * FROM events WHERE __time > '{{since}}'"
//! ```

mod app;
mod cli;
mod error;
mod formatter;
mod hook;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match app::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(stage = err.stage(), "Invocation failed");
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
