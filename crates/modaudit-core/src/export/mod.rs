/// Export module — writes an [`AuditTable`] to disk.
///
/// Two-tier strategy, chosen by the destination's extension:
/// - **Tier 1 (Parquet):** typed columnar output for `.pq` / `.parquet`
///   (configurable).
/// - **Tier 2 (CSV):** delimited text for everything else, and the fallback
///   when Parquet serialization fails.
///
/// Opening the destination is kept separate from encoding into it. A path
/// that cannot be created is fatal straight away; only errors raised after
/// the file is open count as a format problem and trigger the fallback.
pub mod csv_format;
pub mod parquet_format;

pub use csv_format::CsvFormat;
pub use parquet_format::ParquetFormat;

use crate::config::ExportConfig;
use crate::error::{ExportError, SerializationError};
use crate::model::AuditTable;
use crate::scanner::progress::Reporter;
use std::fs::File;
use std::path::{Path, PathBuf};

/// An encoder that serializes a whole table into an open file.
pub trait TableFormat {
    /// Short name used in logs and errors ("Parquet", "CSV").
    fn name(&self) -> &'static str;

    fn write_table(&self, table: &AuditTable, out: File) -> Result<(), SerializationError>;
}

/// Output format that ended up in the destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Parquet,
    Csv,
}

impl OutputFormat {
    /// Parquet when the destination's extension is one of
    /// `binary_extensions` (case-insensitive), CSV otherwise.
    pub fn for_destination(destination: &Path, binary_extensions: &[String]) -> Self {
        let ext = destination
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let is_binary = !ext.is_empty()
            && binary_extensions
                .iter()
                .any(|b| b.trim_start_matches('.').eq_ignore_ascii_case(&ext));

        if is_binary {
            Self::Parquet
        } else {
            Self::Csv
        }
    }
}

/// What an export actually did.
#[derive(Debug)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub rows: usize,
    /// Set when Parquet was requested but the table was written as CSV.
    pub fallback: Option<SerializationError>,
}

pub struct Exporter {
    binary: Box<dyn TableFormat>,
    text: Box<dyn TableFormat>,
    binary_extensions: Vec<String>,
}

impl Exporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            binary: Box::new(ParquetFormat::new(config.compression)),
            text: Box::new(CsvFormat),
            binary_extensions: config.binary_extensions.clone(),
        }
    }

    /// Replace the binary encoder.
    pub fn with_binary_format(mut self, format: impl TableFormat + 'static) -> Self {
        self.binary = Box::new(format);
        self
    }

    /// Replace the text encoder.
    pub fn with_text_format(mut self, format: impl TableFormat + 'static) -> Self {
        self.text = Box::new(format);
        self
    }

    /// Write `table` to `destination`, creating or truncating it.
    ///
    /// The parent directory must already exist. When Parquet is selected and
    /// fails, the same path is rewritten as CSV and the original error is
    /// returned in [`ExportOutcome::fallback`]. A CSV failure is fatal.
    pub fn export(
        &self,
        table: &AuditTable,
        destination: &Path,
        reporter: &Reporter,
    ) -> Result<ExportOutcome, ExportError> {
        let format = OutputFormat::for_destination(destination, &self.binary_extensions);

        let fallback = match format {
            OutputFormat::Csv => {
                let out = open(destination)?;
                self.text
                    .write_table(table, out)
                    .map_err(|source| ExportError::Text {
                        path: destination.to_path_buf(),
                        source,
                    })?;
                None
            }
            OutputFormat::Parquet => {
                let out = open(destination)?;
                match self.binary.write_table(table, out) {
                    Ok(()) => None,
                    Err(binary) => {
                        reporter.fallback(destination, self.text.name(), &binary);
                        let out = open(destination)?;
                        if let Err(text) = self.text.write_table(table, out) {
                            return Err(ExportError::FallbackFailed {
                                path: destination.to_path_buf(),
                                binary,
                                text,
                            });
                        }
                        Some(binary)
                    }
                }
            }
        };

        let written = if fallback.is_some() {
            OutputFormat::Csv
        } else {
            format
        };
        let name = match written {
            OutputFormat::Parquet => self.binary.name(),
            OutputFormat::Csv => self.text.name(),
        };
        reporter.exported(destination, name, table.len());

        Ok(ExportOutcome {
            path: destination.to_path_buf(),
            format: written,
            rows: table.len(),
            fallback,
        })
    }
}

fn open(destination: &Path) -> Result<File, ExportError> {
    File::create(destination).map_err(|source| ExportError::Destination {
        path: destination.to_path_buf(),
        source,
    })
}
