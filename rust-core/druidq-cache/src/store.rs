// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! On-disk result store.
//!
//! One file per query under a single root directory, named
//! `<fingerprint>.<extension>`. Entries never expire. Writes go to a
//! `.tmp` sibling first and are renamed into place, so a half-written file is
//! never mistaken for a cached result.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use druidq_table::{ParquetCodec, ResultTable, TableCodec};
use tracing::debug;

use crate::error::{CacheError, CacheResult};
use crate::fingerprint::fingerprint;

/// Environment variable overriding the cache root.
pub const CACHE_DIR_ENV: &str = "DRUIDQ_CACHE_DIR";

/// Directory name used under the system temp dir.
pub const DEFAULT_CACHE_DIR_NAME: &str = "druidq";

/// Cache location settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Directory holding all cache files.
    pub root: PathBuf,
}

impl CacheConfig {
    /// Use `root` as the cache directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$DRUIDQ_CACHE_DIR` if set and non-empty, else the default location.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Like [`CacheConfig::from_env`], reading the variable through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        match lookup(CACHE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::with_root(dir),
            _ => Self::default(),
        }
    }
}

impl Default for CacheConfig {
    /// `<system temp dir>/druidq`.
    fn default() -> Self {
        Self::with_root(std::env::temp_dir().join(DEFAULT_CACHE_DIR_NAME))
    }
}

/// Content-addressed table store.
#[derive(Debug, Clone)]
pub struct QueryCache<C = ParquetCodec> {
    root: PathBuf,
    codec: C,
}

impl QueryCache<ParquetCodec> {
    /// A Parquet-backed cache at `config.root`.
    pub fn parquet(config: CacheConfig) -> Self {
        Self::new(config, ParquetCodec::new())
    }
}

impl<C: TableCodec> QueryCache<C> {
    pub fn new(config: CacheConfig, codec: C) -> Self {
        Self {
            root: config.root,
            codec,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache file path for `query`. Identical text always maps to the same
    /// path.
    pub fn path_for(&self, query: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", fingerprint(query), self.codec.extension()))
    }

    /// Create the cache root if needed.
    pub fn ensure_root(&self) -> CacheResult<()> {
        fs::create_dir_all(&self.root).map_err(|source| CacheError::Io {
            path: self.root.clone(),
            source,
        })
    }

    /// Read the cached table at `path`. `Ok(None)` if there is no entry.
    pub fn read(&self, path: &Path) -> CacheResult<Option<ResultTable>> {
        if !path.is_file() {
            return Ok(None);
        }
        self.codec
            .read(path)
            .map(Some)
            .map_err(|source| CacheError::Codec {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write `table` to `path`, replacing any previous entry.
    pub fn write(&self, path: &Path, table: &ResultTable) -> CacheResult<()> {
        let tmp = tmp_path(path);

        if let Err(source) = self.codec.write(table, &tmp) {
            let _ = fs::remove_file(&tmp);
            return Err(CacheError::Codec {
                path: path.to_path_buf(),
                source,
            });
        }

        fs::rename(&tmp, path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            CacheError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        debug!(path = %path.display(), rows = table.num_rows(), "Cache entry written");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
