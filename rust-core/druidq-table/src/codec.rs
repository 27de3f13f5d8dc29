// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! On-disk encoding of result tables.
//!
//! [`TableCodec`] is the seam the query cache serializes through;
//! [`ParquetCodec`] is the implementation used in practice. Tables are
//! mapped onto a single Arrow [`RecordBatch`] with nullable columns and
//! written with the Parquet `ArrowWriter`. Reading accepts files produced by
//! other writers as long as every column is numeric, boolean, textual or
//! temporal (temporal columns come back as text).

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Float64Type, Int64Type, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use crate::error::{CodecError, CodecResult};
use crate::table::{Column, ColumnData, ColumnType, ResultTable};

/// Serializes result tables to and from files.
pub trait TableCodec {
    /// File extension (without the dot) for files written by this codec.
    fn extension(&self) -> &'static str;

    /// Write `table` to `path`, replacing any existing file.
    fn write(&self, table: &ResultTable, path: &Path) -> CodecResult<()>;

    /// Read a table previously written to `path`.
    fn read(&self, path: &Path) -> CodecResult<ResultTable>;
}

/// Parquet encoding via Arrow.
#[derive(Debug, Clone)]
pub struct ParquetCodec {
    compression: Compression,
}

impl ParquetCodec {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
        }
    }
}

impl Default for ParquetCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl TableCodec for ParquetCodec {
    fn extension(&self) -> &'static str {
        "parquet"
    }

    fn write(&self, table: &ResultTable, path: &Path) -> CodecResult<()> {
        let batch = to_record_batch(table)?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .build();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        debug!(
            path = %path.display(),
            rows = table.num_rows(),
            columns = table.num_columns(),
            "Wrote parquet table"
        );
        Ok(())
    }

    fn read(&self, path: &Path) -> CodecResult<ResultTable> {
        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

        // Columns are typed from the schema up front so zero-row files still
        // produce a table with the right shape.
        let schema = builder.schema().clone();
        let mut columns = schema
            .fields()
            .iter()
            .map(|field| {
                let column_type = column_type_for(field.name(), field.data_type())?;
                Ok(Column::new(field.name().clone(), ColumnData::empty(column_type)))
            })
            .collect::<CodecResult<Vec<_>>>()?;

        let reader = builder.build()?;
        for batch in reader {
            let batch = batch?;
            for (column, array) in columns.iter_mut().zip(batch.columns()) {
                let chunk = column_from_array(&column.name, array)?;
                column.data.append(&column.name, chunk)?;
            }
        }

        Ok(ResultTable::new(columns)?)
    }
}

// ---------------------------------------------------------------------------
// Table → Arrow
// ---------------------------------------------------------------------------

/// Convert a table to a single Arrow record batch.
pub fn to_record_batch(table: &ResultTable) -> CodecResult<RecordBatch> {
    if table.num_columns() == 0 {
        return Err(CodecError::EmptySchema);
    }

    let mut fields = Vec::with_capacity(table.num_columns());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.num_columns());
    for column in table.columns() {
        let (data_type, array): (DataType, ArrayRef) = match &column.data {
            ColumnData::Int64(v) => (DataType::Int64, Arc::new(Int64Array::from(v.clone()))),
            ColumnData::Float64(v) => (DataType::Float64, Arc::new(Float64Array::from(v.clone()))),
            ColumnData::Boolean(v) => (DataType::Boolean, Arc::new(BooleanArray::from(v.clone()))),
            ColumnData::Utf8(v) => (DataType::Utf8, Arc::new(StringArray::from(v.clone()))),
        };
        fields.push(Field::new(column.name.clone(), data_type, true));
        arrays.push(array);
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

// ---------------------------------------------------------------------------
// Arrow → Table
// ---------------------------------------------------------------------------

fn column_type_for(column: &str, data_type: &DataType) -> CodecResult<ColumnType> {
    match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => Ok(ColumnType::Int64),
        DataType::Float16 | DataType::Float32 | DataType::Float64 => Ok(ColumnType::Float64),
        DataType::Boolean => Ok(ColumnType::Boolean),
        DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Utf8View
        | DataType::Date32
        | DataType::Date64
        | DataType::Timestamp(_, _) => Ok(ColumnType::Utf8),
        other => Err(CodecError::UnsupportedType {
            column: column.to_string(),
            data_type: other.to_string(),
        }),
    }
}

fn column_from_array(column: &str, array: &ArrayRef) -> CodecResult<ColumnData> {
    let data = match column_type_for(column, array.data_type())? {
        ColumnType::Int64 => {
            let cast = cast(array, &DataType::Int64)?;
            ColumnData::Int64(cast.as_primitive::<Int64Type>().iter().collect())
        }
        ColumnType::Float64 => {
            let cast = cast(array, &DataType::Float64)?;
            ColumnData::Float64(cast.as_primitive::<Float64Type>().iter().collect())
        }
        ColumnType::Boolean => ColumnData::Boolean(array.as_boolean().iter().collect()),
        ColumnType::Utf8 => {
            let cast = cast(array, &DataType::Utf8)?;
            ColumnData::Utf8(
                cast.as_string::<i32>()
                    .iter()
                    .map(|v| v.map(str::to_owned))
                    .collect(),
            )
        }
    };
    debug_assert_eq!(data.len(), array.len());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow::array::{Int32Array, TimestampMillisecondArray};
    use tempfile::TempDir;

    fn sample_table() -> ResultTable {
        ResultTable::new(vec![
            Column::new("id", ColumnData::Int64(vec![Some(1), None, Some(3)])),
            Column::new("score", ColumnData::Float64(vec![Some(0.5), Some(1.25), None])),
            Column::new("active", ColumnData::Boolean(vec![None, Some(true), Some(false)])),
            Column::new(
                "name",
                ColumnData::Utf8(vec![Some("a".to_string()), Some("{{b}}".to_string()), None]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_write_then_read_preserves_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.parquet");
        let codec = ParquetCodec::new();

        let table = sample_table();
        codec.write(&table, &path).unwrap();
        let back = codec.read(&path).unwrap();

        assert_eq!(back, table);
    }

    #[test]
    fn test_zero_row_table_keeps_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.parquet");
        let codec = ParquetCodec::new();

        let table = ResultTable::new(vec![Column::new("t", ColumnData::Utf8(Vec::new()))]).unwrap();
        codec.write(&table, &path).unwrap();
        let back = codec.read(&path).unwrap();

        assert_eq!(back.column_names(), vec!["t"]);
        assert_eq!(back.num_rows(), 0);
    }

    #[test]
    fn test_table_without_columns_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("none.parquet");

        let err = ParquetCodec::new()
            .write(&ResultTable::empty(), &path)
            .unwrap_err();
        assert!(matches!(err, CodecError::EmptySchema));
        assert!(!path.exists());
    }

    #[test]
    fn test_read_widens_foreign_types() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("foreign.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("small", DataType::Int32, true),
            Field::new(
                "__time",
                DataType::Timestamp(arrow::datatypes::TimeUnit::Millisecond, None),
                true,
            ),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int32Array::from(vec![Some(7), None])),
                Arc::new(TimestampMillisecondArray::from(vec![Some(0), Some(1_000)])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = ParquetCodec::new().read(&path).unwrap();
        assert_eq!(
            table.column("small").unwrap().data,
            ColumnData::Int64(vec![Some(7), None])
        );
        assert_eq!(table.column("__time").unwrap().data.column_type(), ColumnType::Utf8);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = ParquetCodec::new()
            .read(&dir.path().join("absent.parquet"))
            .unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }

    #[test]
    fn test_read_garbage_is_parquet_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.parquet");
        std::fs::write(&path, b"not a parquet file").unwrap();

        let err = ParquetCodec::new().read(&path).unwrap_err();
        assert!(matches!(err, CodecError::Parquet(_)));
    }
}
