// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Post-processing hook.
//!
//! The hook runs operator-supplied code against the result table. It is not
//! sandboxed: the script runs with the invoking user's privileges.
//!
//! [`ShellHook`] hands the script to the host shell, streams the table to its
//! stdin and exports the parameter mapping as `DRUIDQ_PARAMS` (a JSON
//! object, only set when the query declared parameters).

use std::fmt;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use druidq_query::Params;
use druidq_table::ResultTable;
use thiserror::Error;
use tracing::debug;

use crate::formatter::to_csv;

/// Environment variable carrying the parameter mapping.
pub const PARAMS_ENV: &str = "DRUIDQ_PARAMS";

/// Errors raised by a post-processing hook.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to start script: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to send result table to script: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to encode hook input: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("script exited with {}", exit_description(.code))]
    Exit { code: Option<i32> },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Runs user code against a result table.
pub trait PostProcessor {
    fn run(&self, script: &str, table: &ResultTable, params: Option<&Params>)
        -> Result<(), HookError>;
}

/// How the table is written to the script's stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvalFormat {
    #[default]
    Csv,
    Json,
}

impl fmt::Display for EvalFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalFormat::Csv => write!(f, "csv"),
            EvalFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for EvalFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(EvalFormat::Csv),
            "json" => Ok(EvalFormat::Json),
            other => Err(format!("Unknown eval format '{other}'. Valid formats: csv, json")),
        }
    }
}

/// Runs scripts with `sh -c` (`cmd /C` on Windows).
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellHook {
    format: EvalFormat,
}

impl ShellHook {
    pub fn new(format: EvalFormat) -> Self {
        Self { format }
    }

    fn encode(&self, table: &ResultTable) -> Result<String, HookError> {
        match self.format {
            EvalFormat::Csv => Ok(to_csv(table)),
            EvalFormat::Json => Ok(serde_json::to_string(&table.to_json_records())?),
        }
    }
}

impl PostProcessor for ShellHook {
    fn run(
        &self,
        script: &str,
        table: &ResultTable,
        params: Option<&Params>,
    ) -> Result<(), HookError> {
        let input = self.encode(table)?;

        let mut command = shell_command(script);
        command.stdin(Stdio::piped());
        if let Some(params) = params {
            command.env(PARAMS_ENV, serde_json::to_string(params)?);
        }

        debug!(format = %self.format, bytes = input.len(), "Starting post-processing script");
        let mut child = command.spawn().map_err(HookError::Spawn)?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input.as_bytes()) {
                // The script is free to ignore its input.
                Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {}
                Err(err) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(HookError::Stdin(err));
                }
                Ok(()) => {}
            }
        }

        let status = child.wait().map_err(HookError::Spawn)?;
        if !status.success() {
            return Err(HookError::Exit {
                code: status.code(),
            });
        }
        Ok(())
    }
}

#[cfg(windows)]
fn shell_command(script: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(script);
    command
}

#[cfg(not(windows))]
fn shell_command(script: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(script);
    command
}
