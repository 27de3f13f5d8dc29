// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Output formatters for query results.
//!
//! Supports three output modes:
//! - **Table**: Human-readable columnar output using `comfy-table`.
//! - **JSON**: Pretty-printed array of row objects.
//! - **CSV**: Comma-separated values for pipeline consumption.

use comfy_table::{Cell, ContentArrangement, Table};
use druidq_table::ResultTable;
use serde_json::Value;
use std::fmt;

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!(
                "Unknown format '{other}'. Valid formats: table, json, csv"
            )),
        }
    }
}

/// Render `table` in the selected output format.
pub fn format_result(table: &ResultTable, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(table),
        OutputFormat::Table => format_grid(table),
        OutputFormat::Csv => to_csv(table),
    }
}

/// Pretty-print the rows as a JSON array of objects.
fn format_json(table: &ResultTable) -> String {
    let records = table.to_json_records();
    serde_json::to_string_pretty(&records).unwrap_or_else(|_| records.to_string())
}

/// Render the table with a header row and a row-count footer.
fn format_grid(table: &ResultTable) -> String {
    let row_count = table.num_rows();
    let footer = format!("({row_count} row{})", if row_count == 1 { "" } else { "s" });

    if table.num_columns() == 0 {
        return footer;
    }

    let mut grid = Table::new();
    grid.set_content_arrangement(ContentArrangement::Dynamic);
    grid.set_header(table.column_names().into_iter().map(Cell::new));

    for idx in 0..row_count {
        let cells: Vec<Cell> = table
            .row(idx)
            .iter()
            .map(|val| Cell::new(value_to_cell(val)))
            .collect();
        grid.add_row(cells);
    }

    format!("{grid}\n{footer}")
}

/// Convert a cell value to display text.
fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render the table as CSV with a header line. `NULL` is an empty field.
pub fn to_csv(table: &ResultTable) -> String {
    let mut output = String::new();

    if table.num_columns() == 0 {
        return output;
    }

    let header: Vec<String> = table
        .column_names()
        .into_iter()
        .map(csv_escape_str)
        .collect();
    output.push_str(&header.join(","));
    output.push('\n');

    for idx in 0..table.num_rows() {
        let cells: Vec<String> = table.row(idx).iter().map(csv_escape).collect();
        output.push_str(&cells.join(","));
        output.push('\n');
    }

    output
}

/// Escape a cell value for CSV output.
fn csv_escape(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => csv_escape_str(s),
        other => csv_escape_str(&other.to_string()),
    }
}

/// Escape a string for CSV output per RFC 4180.
fn csv_escape_str(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use druidq_table::{Column, ColumnData};

    fn sample() -> ResultTable {
        ResultTable::new(vec![
            Column::new("id", ColumnData::Utf8(vec![Some("abc".into()), Some("d,ef".into())])),
            Column::new("score", ColumnData::Float64(vec![Some(0.95), None])),
        ])
        .unwrap()
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_format_grid() {
        let out = format_result(&sample(), OutputFormat::Table);
        assert!(out.contains("abc"));
        assert!(out.contains("0.95"));
        assert!(out.contains("NULL"));
        assert!(out.ends_with("(2 rows)"));
    }

    #[test]
    fn test_format_grid_single_row_and_empty() {
        let one = ResultTable::new(vec![Column::new("t", ColumnData::Int64(vec![Some(42)]))]).unwrap();
        assert!(format_result(&one, OutputFormat::Table).ends_with("(1 row)"));
        assert_eq!(format_result(&ResultTable::empty(), OutputFormat::Table), "(0 rows)");
    }

    #[test]
    fn test_format_json_records() {
        let out = format_result(&sample(), OutputFormat::Json);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([
                {"id": "abc", "score": 0.95},
                {"id": "d,ef", "score": null}
            ])
        );
    }

    #[test]
    fn test_csv_output() {
        assert_eq!(to_csv(&sample()), "id,score\nabc,0.95\n\"d,ef\",\n");
        assert_eq!(to_csv(&ResultTable::empty()), "");
    }

    #[test]
    fn test_csv_escape_quotes() {
        assert_eq!(csv_escape_str("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape_str("plain"), "plain");
    }
}
