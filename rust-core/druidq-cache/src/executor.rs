// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Cache-fronted query execution.
//!
//! [`CachedExecutor`] sits in front of a [`QueryBackend`]. A query whose
//! fingerprint already has a cache file is answered from disk without
//! touching the backend; otherwise the backend runs it and the result is
//! written to the cache on a best-effort basis. Cache failures of any kind
//! are logged and never fail the query. Backend failures are returned
//! unchanged.

use std::path::PathBuf;

use druidq_table::{ParquetCodec, ResultTable, TableCodec};
use tracing::{info, warn};

use crate::store::QueryCache;

/// Something that can run SQL and return a table.
pub trait QueryBackend {
    type Error: std::error::Error + Send + Sync + 'static;

    fn execute(&self, sql: &str) -> Result<ResultTable, Self::Error>;
}

impl<B: QueryBackend + ?Sized> QueryBackend for &B {
    type Error = B::Error;

    fn execute(&self, sql: &str) -> Result<ResultTable, Self::Error> {
        (**self).execute(sql)
    }
}

/// How an execution may use the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Serve hits from disk, store misses.
    #[default]
    ReadWrite,
    /// Always run the query and overwrite the cache entry.
    Refresh,
    /// Run the query without reading or writing the cache.
    Bypass,
}

/// What happened to the cache during an execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Served from this cache file; the backend was not called.
    Hit(PathBuf),
    /// Backend result stored at this path.
    Stored(PathBuf),
    /// Backend result could not be stored.
    NotStored,
    /// The cache was not consulted.
    Bypassed,
}

/// A table and how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub table: ResultTable,
    pub outcome: CacheOutcome,
}

/// Runs queries through the on-disk cache.
pub struct CachedExecutor<B, C = ParquetCodec> {
    backend: B,
    cache: QueryCache<C>,
}

impl<B: QueryBackend, C: TableCodec> CachedExecutor<B, C> {
    pub fn new(backend: B, cache: QueryCache<C>) -> Self {
        Self { backend, cache }
    }

    pub fn cache(&self) -> &QueryCache<C> {
        &self.cache
    }

    /// Execute `sql` under `policy`.
    pub fn execute(&self, sql: &str, policy: CachePolicy) -> Result<Execution, B::Error> {
        if policy == CachePolicy::Bypass {
            let table = self.backend.execute(sql)?;
            return Ok(Execution {
                table,
                outcome: CacheOutcome::Bypassed,
            });
        }

        let path = self.cache.path_for(sql);
        let cache_ready = match self.cache.ensure_root() {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Cache directory unavailable, running uncached");
                false
            }
        };

        if cache_ready && policy == CachePolicy::ReadWrite {
            match self.cache.read(&path) {
                Ok(Some(table)) => {
                    info!(path = %path.display(), rows = table.num_rows(), "Loading cache");
                    return Ok(Execution {
                        table,
                        outcome: CacheOutcome::Hit(path),
                    });
                }
                Ok(None) => {}
                Err(err) => warn!(error = %err, "Unreadable cache entry, treating as a miss"),
            }
        }

        let table = self.backend.execute(sql)?;

        if !cache_ready {
            return Ok(Execution {
                table,
                outcome: CacheOutcome::NotStored,
            });
        }

        info!(path = %path.display(), rows = table.num_rows(), "Saving cache");
        let outcome = match self.cache.write(&path, &table) {
            Ok(()) => CacheOutcome::Stored(path),
            Err(err) => {
                warn!(error = %err, "Error saving cache");
                CacheOutcome::NotStored
            }
        };

        Ok(Execution { table, outcome })
    }
}
