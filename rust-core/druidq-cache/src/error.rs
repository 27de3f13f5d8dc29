// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cache error types. None of these are fatal to a query: the executor logs
// them and carries on without the cache.

use std::path::PathBuf;

use druidq_table::CodecError;
use thiserror::Error;

/// Errors raised by the on-disk query cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Creating the cache directory or moving a file into place failed.
    #[error("cache I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table codec could not read or write a cache file.
    #[error("cache file {} could not be encoded or decoded: {source}", path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

/// Result alias for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
