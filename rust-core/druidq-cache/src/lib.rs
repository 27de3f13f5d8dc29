// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! druidq result cache.
//!
//! Query results are stored as Parquet files keyed by a fingerprint of the
//! final query text. [`CachedExecutor`] puts the cache in front of any
//! [`QueryBackend`].

pub mod error;
pub mod executor;
pub mod fingerprint;
pub mod store;

pub use error::{CacheError, CacheResult};
pub use executor::{CacheOutcome, CachePolicy, CachedExecutor, Execution, QueryBackend};
pub use fingerprint::{fingerprint, FINGERPRINT_LEN};
pub use store::{CacheConfig, QueryCache, CACHE_DIR_ENV, DEFAULT_CACHE_DIR_NAME};
