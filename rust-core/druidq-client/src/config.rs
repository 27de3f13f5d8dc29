// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Client configuration and connection-string handling.
//!
//! Connection strings follow the SQLAlchemy-style Druid form
//! (`druid://host:port/`). They are mapped onto the broker's HTTP SQL
//! endpoint:
//!
//! | Connection string                      | Endpoint                               |
//! |----------------------------------------|----------------------------------------|
//! | `druid://host:8887/`                   | `http://host:8887/druid/v2/sql/`       |
//! | `druid+https://host/`                  | `https://host/druid/v2/sql/`           |
//! | `http://host:8082/druid/v2/sql`        | used as given                          |
//! | `https://host/proxy/`                  | `https://host/proxy/druid/v2/sql/`     |

use std::time::Duration;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Environment variable holding the connection string.
pub const URL_ENV: &str = "DRUIDQ_URL";

/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "DRUIDQ_TIMEOUT_SECS";

/// Connection string used when `DRUIDQ_URL` is unset.
pub const DEFAULT_URL: &str = "druid://localhost:8887/";

/// Request timeout used when `DRUIDQ_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Path of the Druid SQL API.
const SQL_PATH: &str = "druid/v2/sql";

/// Datastore client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Connection string, e.g. `druid://localhost:8887/`.
    pub url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Read `DRUIDQ_URL` and `DRUIDQ_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.url = url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|t| !t.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("{TIMEOUT_ENV} must be a whole number of seconds, got {raw:?}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Replace the connection string.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// Basic-auth credentials carried in a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

/// A resolved SQL endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: Url,
    pub credentials: Option<Credentials>,
}

/// Map a connection string onto the HTTP SQL endpoint.
pub fn sql_endpoint(conn: &str) -> ClientResult<Endpoint> {
    let parsed = Url::parse(conn)
        .map_err(|e| ClientError::Config(format!("invalid connection string {conn:?}: {e}")))?;

    let transport = match parsed.scheme() {
        "druid" | "druid+http" | "http" => "http",
        "druid+https" | "https" => "https",
        other => {
            return Err(ClientError::Config(format!(
                "unsupported scheme {other:?} in {conn:?}"
            )))
        }
    };

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ClientError::Config(format!("no host in connection string {conn:?}")))?;
    let port = parsed.port().map(|p| format!(":{p}")).unwrap_or_default();

    let mut url = Url::parse(&format!("{transport}://{host}{port}/"))
        .map_err(|e| ClientError::Config(format!("invalid host in {conn:?}: {e}")))?;
    url.set_path(&sql_path(parsed.path()));
    url.set_query(parsed.query());

    let credentials = if parsed.username().is_empty() {
        None
    } else {
        Some(Credentials {
            username: decode_userinfo(parsed.username())?,
            password: parsed.password().map(decode_userinfo).transpose()?,
        })
    };

    Ok(Endpoint { url, credentials })
}

/// `Url` keeps userinfo percent-encoded; basic auth needs the raw text.
fn decode_userinfo(raw: &str) -> ClientResult<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|text| text.into_owned())
        .map_err(|e| ClientError::Config(format!("credentials are not valid UTF-8: {e}")))
}

fn sql_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.ends_with(&format!("/{SQL_PATH}")) {
        path.to_string()
    } else {
        format!("{trimmed}/{SQL_PATH}/")
    }
}
