// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! HTTP client for the Druid SQL API.
//!
//! Wraps `reqwest::blocking::Client`. Queries are posted with
//! `resultFormat: "array"` and `header: true`, so the response is a JSON
//! array whose first element lists the column names.

use druidq_cache::QueryBackend;
use druidq_table::ResultTable;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::{sql_endpoint, ClientConfig, Endpoint};
use crate::error::{ClientError, ClientResult};

/// Body of a Druid SQL request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SqlRequest<'a> {
    query: &'a str,
    result_format: &'static str,
    header: bool,
}

/// The part of a Druid error body worth showing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DruidErrorBody {
    error_message: Option<String>,
}

/// Blocking client for one Druid SQL endpoint.
pub struct DruidClient {
    endpoint: Endpoint,
    http: Client,
}

impl DruidClient {
    /// Build a client from `config`. Fails if the connection string cannot
    /// be mapped to an endpoint.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let endpoint = sql_endpoint(&config.url)?;
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { endpoint, http })
    }

    /// The HTTP endpoint queries are posted to.
    pub fn endpoint(&self) -> &str {
        self.endpoint.url.as_str()
    }

    /// Run `sql` and return its result set.
    pub fn query(&self, sql: &str) -> ClientResult<ResultTable> {
        debug!(endpoint = %self.endpoint.url, bytes = sql.len(), "Sending query");

        let payload = SqlRequest {
            query: sql,
            result_format: "array",
            header: true,
        };

        let mut request = self.http.post(self.endpoint.url.clone()).json(&payload);
        if let Some(creds) = &self.endpoint.credentials {
            request = request.basic_auth(&creds.username, creds.password.as_deref());
        }

        let table = handle_response(request.send()?)?;
        debug!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            "Query returned"
        );
        Ok(table)
    }
}

impl QueryBackend for DruidClient {
    type Error = ClientError;

    fn execute(&self, sql: &str) -> ClientResult<ResultTable> {
        self.query(sql)
    }
}

fn handle_response(response: Response) -> ClientResult<ResultTable> {
    let status = response.status();
    let body = response.text()?;

    if !status.is_success() {
        return Err(ClientError::Server {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    decode_rows(&body)
}

/// Decode an array-format response with a header row.
///
/// An empty array is an empty table. Header cells that are not strings use
/// their JSON text as the column name.
pub fn decode_rows(body: &str) -> ClientResult<ResultTable> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ClientError::Parse(format!("invalid JSON: {e}")))?;

    let Value::Array(rows) = value else {
        return Err(ClientError::Parse("expected a JSON array of rows".to_string()));
    };

    let mut rows = rows.into_iter();
    let header = match rows.next() {
        None => return Ok(ResultTable::empty()),
        Some(Value::Array(cells)) => cells
            .into_iter()
            .map(|cell| match cell {
                Value::String(name) => name,
                other => other.to_string(),
            })
            .collect(),
        Some(_) => return Err(ClientError::Parse("header row is not an array".to_string())),
    };

    let data = rows
        .enumerate()
        .map(|(idx, row)| match row {
            Value::Array(cells) => Ok(cells),
            _ => Err(ClientError::Parse(format!("row {idx} is not an array"))),
        })
        .collect::<ClientResult<Vec<_>>>()?;

    Ok(ResultTable::from_json_rows(header, data)?)
}

/// `errorMessage` from a Druid error body, else the trimmed body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<DruidErrorBody>(body)
        .ok()
        .and_then(|e| e.error_message)
        .unwrap_or_else(|| body.trim().to_string())
}
