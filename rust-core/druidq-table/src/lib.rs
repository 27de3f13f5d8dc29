// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! druidq result tables.
//!
//! The table model shared by the datastore client, the query cache and the
//! command-line front end, plus the Parquet codec used to persist tables in
//! the cache directory.

pub mod codec;
pub mod error;
pub mod table;

pub use codec::{to_record_batch, ParquetCodec, TableCodec};
pub use error::{CodecError, CodecResult, TableError, TableResult};
pub use table::{Column, ColumnData, ColumnType, ResultTable};
