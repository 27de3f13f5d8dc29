// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! In-memory result tables.
//!
//! A [`ResultTable`] is an ordered list of named, typed, nullable columns of
//! equal length. Tables are built from the JSON rows returned by the SQL
//! endpoint, where each column's type is inferred from its values, and are
//! converted back to JSON objects for display and post-processing.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{TableError, TableResult};

// ---------------------------------------------------------------------------
// Column types
// ---------------------------------------------------------------------------

/// Logical type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int64,
    Float64,
    Boolean,
    Utf8,
}

impl ColumnType {
    /// Lower-case type name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Int64 => "int64",
            ColumnType::Float64 => "float64",
            ColumnType::Boolean => "boolean",
            ColumnType::Utf8 => "utf8",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values of one column. `None` is SQL `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Utf8(Vec<Option<String>>),
}

impl ColumnData {
    /// An empty column of the given type.
    pub fn empty(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Int64 => ColumnData::Int64(Vec::new()),
            ColumnType::Float64 => ColumnData::Float64(Vec::new()),
            ColumnType::Boolean => ColumnData::Boolean(Vec::new()),
            ColumnType::Utf8 => ColumnData::Utf8(Vec::new()),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Int64(_) => ColumnType::Int64,
            ColumnData::Float64(_) => ColumnType::Float64,
            ColumnData::Boolean(_) => ColumnType::Boolean,
            ColumnData::Utf8(_) => ColumnType::Utf8,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::Utf8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value at `row` as JSON, `Value::Null` for nulls or out-of-range rows.
    pub fn json_value(&self, row: usize) -> Value {
        match self {
            ColumnData::Int64(v) => v.get(row).copied().flatten().map_or(Value::Null, Value::from),
            ColumnData::Float64(v) => v
                .get(row)
                .copied()
                .flatten()
                .and_then(serde_json::Number::from_f64)
                .map_or(Value::Null, Value::Number),
            ColumnData::Boolean(v) => v.get(row).copied().flatten().map_or(Value::Null, Value::Bool),
            ColumnData::Utf8(v) => v
                .get(row)
                .cloned()
                .flatten()
                .map_or(Value::Null, Value::String),
        }
    }

    /// Append another chunk of the same type, as produced by multi-batch reads.
    pub fn append(&mut self, column: &str, other: ColumnData) -> TableResult<()> {
        match (self, other) {
            (ColumnData::Int64(a), ColumnData::Int64(b)) => a.extend(b),
            (ColumnData::Float64(a), ColumnData::Float64(b)) => a.extend(b),
            (ColumnData::Boolean(a), ColumnData::Boolean(b)) => a.extend(b),
            (ColumnData::Utf8(a), ColumnData::Utf8(b)) => a.extend(b),
            (existing, other) => {
                return Err(TableError::TypeMismatch {
                    column: column.to_string(),
                    expected: existing.column_type().name(),
                    actual: other.column_type().name(),
                })
            }
        }
        Ok(())
    }

    /// Build a column from JSON cells, inferring the narrowest type that
    /// holds every non-null value.
    ///
    /// - all integers → `Int64`
    /// - all numbers, at least one non-integer → `Float64`
    /// - all booleans → `Boolean`
    /// - anything else (including all-null) → `Utf8`, non-string values
    ///   rendered as compact JSON
    pub fn from_json_cells(cells: &[Value]) -> Self {
        match infer_type(cells) {
            ColumnType::Int64 => ColumnData::Int64(cells.iter().map(Value::as_i64).collect()),
            ColumnType::Float64 => ColumnData::Float64(cells.iter().map(Value::as_f64).collect()),
            ColumnType::Boolean => ColumnData::Boolean(cells.iter().map(Value::as_bool).collect()),
            ColumnType::Utf8 => ColumnData::Utf8(
                cells
                    .iter()
                    .map(|cell| match cell {
                        Value::Null => None,
                        Value::String(s) => Some(s.clone()),
                        other => Some(other.to_string()),
                    })
                    .collect(),
            ),
        }
    }
}

fn infer_type(cells: &[Value]) -> ColumnType {
    let mut non_null = cells.iter().filter(|c| !c.is_null()).peekable();
    if non_null.peek().is_none() {
        return ColumnType::Utf8;
    }

    let mut all_int = true;
    let mut all_number = true;
    let mut all_bool = true;
    for cell in non_null {
        match cell {
            Value::Number(n) => {
                all_bool = false;
                if n.as_i64().is_none() {
                    all_int = false;
                }
            }
            Value::Bool(_) => {
                all_int = false;
                all_number = false;
            }
            _ => return ColumnType::Utf8,
        }
    }

    if all_bool {
        ColumnType::Boolean
    } else if all_int {
        ColumnType::Int64
    } else if all_number {
        ColumnType::Float64
    } else {
        ColumnType::Utf8
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Tabular query result: rows × named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    columns: Vec<Column>,
    num_rows: usize,
}

impl ResultTable {
    /// Assemble a table, checking that every column has the same length.
    pub fn new(columns: Vec<Column>) -> TableResult<Self> {
        let num_rows = columns.first().map_or(0, |c| c.data.len());
        for column in &columns {
            if column.data.len() != num_rows {
                return Err(TableError::ColumnLength {
                    column: column.name.clone(),
                    expected: num_rows,
                    actual: column.data.len(),
                });
            }
        }
        Ok(Self { columns, num_rows })
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from a header and row-major JSON cells.
    ///
    /// Every row must have exactly one cell per header entry.
    pub fn from_json_rows(header: Vec<String>, rows: Vec<Vec<Value>>) -> TableResult<Self> {
        let width = header.len();
        let mut cells_by_column: Vec<Vec<Value>> =
            (0..width).map(|_| Vec::with_capacity(rows.len())).collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(TableError::RaggedRow {
                    row: row_idx,
                    expected: width,
                    actual: row.len(),
                });
            }
            for (col_idx, cell) in row.into_iter().enumerate() {
                cells_by_column[col_idx].push(cell);
            }
        }

        let columns = header
            .into_iter()
            .zip(cells_by_column)
            .map(|(name, cells)| Column::new(name, ColumnData::from_json_cells(&cells)))
            .collect();
        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Row `idx` as JSON values in column order.
    pub fn row(&self, idx: usize) -> Vec<Value> {
        self.columns.iter().map(|c| c.data.json_value(idx)).collect()
    }

    /// All rows as JSON objects keyed by column name, in column order.
    ///
    /// If two columns share a name the later one wins in each object.
    pub fn to_json_records(&self) -> Value {
        let records = (0..self.num_rows)
            .map(|idx| {
                let mut obj = Map::with_capacity(self.columns.len());
                for column in &self.columns {
                    obj.insert(column.name.clone(), column.data.json_value(idx));
                }
                Value::Object(obj)
            })
            .collect();
        Value::Array(records)
    }
}
