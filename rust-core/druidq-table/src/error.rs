// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error types for result tables and the on-disk table codec.

use thiserror::Error;

/// Errors raised while building or combining result tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// A data row has a different number of cells than the header.
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending data row.
        row: usize,
        /// Number of columns declared by the header.
        expected: usize,
        /// Number of cells actually present.
        actual: usize,
    },

    /// A column's length disagrees with the rest of the table.
    #[error("column '{column}' has {actual} values, expected {expected}")]
    ColumnLength {
        /// Name of the offending column.
        column: String,
        /// Row count of the table.
        expected: usize,
        /// Length of the column.
        actual: usize,
    },

    /// Two column chunks of different types were appended together.
    #[error("cannot append {actual} values to {expected} column '{column}'")]
    TypeMismatch {
        /// Name of the column being extended.
        column: String,
        /// Type of the existing column.
        expected: &'static str,
        /// Type of the incoming chunk.
        actual: &'static str,
    },
}

/// Errors raised by a [`crate::TableCodec`] while reading or writing files.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Filesystem error while opening, creating, or writing the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The Parquet reader or writer rejected the data.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow failed to assemble or cast a column.
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// The file holds a column type the table model cannot represent.
    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedType {
        /// Name of the offending column.
        column: String,
        /// Arrow type rendered for display.
        data_type: String,
    },

    /// Tables without columns have no Parquet representation.
    #[error("cannot encode a table with no columns")]
    EmptySchema,

    /// The decoded columns do not form a valid table.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Result alias for table construction.
pub type TableResult<T> = std::result::Result<T, TableError>;

/// Result alias for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;
