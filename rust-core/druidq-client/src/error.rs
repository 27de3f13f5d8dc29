// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Error types for the datastore client.

use druidq_table::TableError;
use thiserror::Error;

/// Errors raised while configuring the client or running a query.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport or connection error.
    #[error("connection error: {0}")]
    Http(#[from] reqwest::Error),

    /// The datastore answered with a non-success status.
    #[error("datastore returned HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body was not the expected array of rows.
    #[error("unexpected response: {0}")]
    Parse(String),

    /// The rows could not be assembled into a table.
    #[error("malformed result set: {0}")]
    Table(#[from] TableError),

    /// Connection string or timeout could not be used.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

/// Result alias for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;
