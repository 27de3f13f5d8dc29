// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Druid SQL client for druidq.
//!
//! [`DruidClient`] posts SQL to a Druid broker and returns a
//! [`druidq_table::ResultTable`]. It implements
//! [`druidq_cache::QueryBackend`] so it can sit behind the result cache.

pub mod client;
pub mod config;
pub mod error;

pub use client::{decode_rows, DruidClient};
pub use config::{
    sql_endpoint, ClientConfig, Credentials, Endpoint, DEFAULT_TIMEOUT_SECS, DEFAULT_URL,
    TIMEOUT_ENV, URL_ENV,
};
pub use error::{ClientError, ClientResult};
