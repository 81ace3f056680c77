/// Delimited-text encoder — the format every export can fall back to.
use super::TableFormat;
use crate::error::SerializationError;
use crate::model::file_record::COLUMNS;
use crate::model::AuditTable;
use std::fs::File;

pub struct CsvFormat;

impl TableFormat for CsvFormat {
    fn name(&self) -> &'static str {
        "CSV"
    }

    /// The header row is written explicitly so an empty table still
    /// produces a file with the six column names.
    fn write_table(&self, table: &AuditTable, out: File) -> Result<(), SerializationError> {
        let err = |e: csv::Error| SerializationError::new("CSV", e);

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);
        wtr.write_record(COLUMNS).map_err(err)?;
        for record in table.rows() {
            wtr.serialize(record).map_err(err)?;
        }
        wtr.flush()
            .map_err(|e| SerializationError::new("CSV", e))
    }
}
