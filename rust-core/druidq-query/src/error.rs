// SPDX-License-Identifier: PMPL-1.0-or-later
//! Query preparation error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading and preparing a query.
///
/// Malformed directives are never errors; they are dropped with a warning.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The query file could not be read.
    #[error("cannot read query file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A placeholder names neither a declared parameter nor an environment
    /// variable.
    #[error("undefined parameter: {0}")]
    UndefinedParameter(String),

    /// A post-processing script file could not be read.
    #[error("cannot read script file {}: {source}", path.display())]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl QueryError {
    /// Pipeline stage the error belongs to, for user-facing diagnostics.
    pub fn stage(&self) -> &'static str {
        match self {
            QueryError::Read { .. } => "input",
            QueryError::UndefinedParameter(_) => "template",
            QueryError::ScriptRead { .. } => "eval",
        }
    }
}

/// Result alias for query preparation.
pub type Result<T> = std::result::Result<T, QueryError>;
