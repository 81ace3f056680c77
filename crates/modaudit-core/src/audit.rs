/// End-to-end audit pipeline: validate config, aggregate roots, export.
use crate::config::AuditConfig;
use crate::error::{AuditError, RootFailure};
use crate::export::{ExportOutcome, Exporter};
use crate::model::AuditTable;
use crate::scanner::progress::Reporter;
use crate::scanner::{aggregate, RootSpec};
use std::path::PathBuf;

/// Everything one audit run needs.
#[derive(Debug, Clone, Default)]
pub struct AuditRequest {
    pub roots: Vec<RootSpec>,
    /// Where to write the table. `None` scans without writing anything.
    pub destination: Option<PathBuf>,
    pub config: AuditConfig,
}

/// Result of a successful (possibly partial) audit.
#[derive(Debug)]
pub struct AuditReport {
    pub table: AuditTable,
    /// Roots that were skipped.
    pub failures: Vec<RootFailure>,
    pub export: Option<ExportOutcome>,
}

/// Run an audit.
///
/// Nothing is written unless at least one root was scanned, so a run where
/// every root fails leaves the destination untouched.
pub fn run(request: &AuditRequest, reporter: &Reporter) -> Result<AuditReport, AuditError> {
    let classifier = request.config.classifier()?;
    let aggregation = aggregate(&request.roots, &classifier, reporter)?;

    let export = match &request.destination {
        Some(destination) => {
            let exporter = Exporter::new(&request.config.export);
            Some(exporter.export(&aggregation.table, destination, reporter)?)
        }
        None => None,
    };

    Ok(AuditReport {
        table: aggregation.table,
        failures: aggregation.failures,
        export,
    })
}
