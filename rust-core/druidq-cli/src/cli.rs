// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use druidq_cache::CachePolicy;
use druidq_client::URL_ENV;
use druidq_query::InputMode;

use crate::formatter::OutputFormat;
use crate::hook::EvalFormat;

/// druidq version string, pulled from Cargo.toml at compile time.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run templated SQL against Druid, caching results locally as Parquet.
#[derive(Parser, Debug)]
#[command(name = "druidq", version = VERSION, about)]
pub struct Cli {
    /// Query text, or a path to a file containing it.
    pub query: String,

    /// Treat QUERY strictly as a file path.
    #[arg(short = 'f', long)]
    pub file: bool,

    /// Post-processing script (highest precedence).
    #[arg(short = 'e', long, value_name = "SCRIPT")]
    pub eval: Option<String>,

    /// Post-processing script file.
    #[arg(long, value_name = "PATH")]
    pub eval_file: Option<PathBuf>,

    /// Format of the table written to the script's stdin.
    #[arg(long, default_value = "csv", value_name = "FORMAT")]
    pub eval_format: EvalFormat,

    /// Skip the cache entirely.
    #[arg(short = 'n', long, conflicts_with = "refresh")]
    pub no_cache: bool,

    /// Re-run the query and overwrite its cache entry.
    #[arg(short = 'r', long)]
    pub refresh: bool,

    /// Print the resolved query and script before running them.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Do not print the result table.
    #[arg(short, long)]
    pub quiet: bool,

    /// Result output format: table, json or csv.
    #[arg(long, default_value = "table", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Cache directory [default: $DRUIDQ_CACHE_DIR, else <temp dir>/druidq].
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Datastore connection string [default: druid://localhost:8887/].
    #[arg(long, env = URL_ENV, value_name = "CONN")]
    pub url: Option<String>,
}

impl Cli {
    pub fn input_mode(&self) -> InputMode {
        if self.file {
            InputMode::File
        } else {
            InputMode::Auto
        }
    }

    pub fn cache_policy(&self) -> CachePolicy {
        if self.no_cache {
            CachePolicy::Bypass
        } else if self.refresh {
            CachePolicy::Refresh
        } else {
            CachePolicy::ReadWrite
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}
