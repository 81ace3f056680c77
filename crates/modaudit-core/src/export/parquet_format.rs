/// Parquet encoder for the audit table.

use super::TableFormat;
use crate::config::ParquetCompression;
use crate::error::SerializationError;
use crate::model::file_record::COLUMNS;
use crate::model::AuditTable;
use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray, TimestampMicrosecondArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef, TimeUnit};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::sync::Arc;

const FORMAT: &str = "Parquet";

pub struct ParquetFormat {
    compression: ParquetCompression,
}

impl ParquetFormat {
    pub fn new(compression: ParquetCompression) -> Self {
        Self { compression }
    }
}

/// Arrow schema of the table: text columns, `Int64` sizes, UTC timestamps.
pub fn schema() -> SchemaRef {
    let [root, relative_path, extension, category, size_bytes, modified_at] = COLUMNS;
    Arc::new(Schema::new(vec![
        Field::new(root, DataType::Utf8, false),
        Field::new(relative_path, DataType::Utf8, false),
        Field::new(extension, DataType::Utf8, false),
        Field::new(category, DataType::Utf8, false),
        Field::new(size_bytes, DataType::Int64, false),
        Field::new(
            modified_at,
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        ),
    ]))
}

/// Convert the table into a single record batch.
pub fn to_record_batch(table: &AuditTable) -> Result<RecordBatch, SerializationError> {
    let rows = table.rows();

    let sizes = rows
        .iter()
        .map(|r| i64::try_from(r.size_bytes))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SerializationError::new(FORMAT, e))?;
    let modified = rows
        .iter()
        .map(|r| r.modified_at.timestamp_micros())
        .collect::<Vec<_>>();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.root.as_str()))),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.relative_path.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.extension.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.category.as_str()),
        )),
        Arc::new(Int64Array::from(sizes)),
        Arc::new(TimestampMicrosecondArray::from(modified).with_timezone("UTC")),
    ];

    RecordBatch::try_new(schema(), columns).map_err(|e| SerializationError::new(FORMAT, e))
}

impl TableFormat for ParquetFormat {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn write_table(&self, table: &AuditTable, out: File) -> Result<(), SerializationError> {
        let batch = to_record_batch(table)?;

        let compression = match self.compression {
            ParquetCompression::Snappy => Compression::SNAPPY,
            ParquetCompression::None => Compression::UNCOMPRESSED,
        };
        let props = WriterProperties::builder()
            .set_compression(compression)
            .build();

        let err = |e: parquet::errors::ParquetError| SerializationError::new(FORMAT, e);
        let mut writer = ArrowWriter::try_new(out, batch.schema(), Some(props)).map_err(err)?;
        writer.write(&batch).map_err(err)?;
        writer.close().map_err(err)?;
        Ok(())
    }
}
