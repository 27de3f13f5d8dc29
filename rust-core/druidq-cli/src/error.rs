// SPDX-License-Identifier: PMPL-1.0-or-later
//! Top-level error for the `druidq` binary.
//!
//! Every variant's message starts with the pipeline stage that failed, so
//! `main` can print it as `error: <stage>: <message>`.

use druidq_client::ClientError;
use druidq_query::QueryError;
use thiserror::Error;

use crate::hook::HookError;

#[derive(Debug, Error)]
pub enum CliError {
    /// Loading the query, resolving placeholders, or reading a script file.
    #[error("{stage}: {0}", stage = .0.stage())]
    Query(#[from] QueryError),

    #[error("config: {0}")]
    Config(#[source] ClientError),

    #[error("execute: {0}")]
    Execute(#[source] ClientError),

    #[error("eval: {0}")]
    Hook(#[from] HookError),

    #[error("output: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    pub fn stage(&self) -> &'static str {
        match self {
            CliError::Query(err) => err.stage(),
            CliError::Config(_) => "config",
            CliError::Execute(_) => "execute",
            CliError::Hook(_) => "eval",
            CliError::Output(_) => "output",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_messages_lead_with_stage() {
        let errors = [
            CliError::Query(QueryError::UndefinedParameter("token".into())),
            CliError::Query(QueryError::Read {
                path: PathBuf::from("q.sql"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
            CliError::Config(ClientError::Config("bad url".into())),
            CliError::Execute(ClientError::Server {
                status: 500,
                message: "boom".into(),
            }),
            CliError::Hook(HookError::Exit { code: Some(1) }),
        ];

        for err in errors {
            assert!(
                err.to_string().starts_with(&format!("{}: ", err.stage())),
                "{err}"
            );
        }
    }

    #[test]
    fn test_undefined_parameter_message() {
        let err = CliError::from(QueryError::UndefinedParameter("nowhere".into()));
        assert_eq!(err.to_string(), "template: undefined parameter: nowhere");
    }
}
