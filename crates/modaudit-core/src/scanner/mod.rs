/// Scanner module — turns module roots into an [`AuditTable`].
///
/// - [`walk`] scans one root lazily and deterministically.
/// - [`aggregate`] runs the walker over every root in caller order,
///   tolerating bad roots as long as at least one succeeds.
///
/// Everything runs on the calling thread; roots are scanned one after
/// another and the table is built incrementally.
pub mod progress;
pub mod walk;

pub use walk::{walk, RootWalk};

use crate::classify::Classifier;
use crate::error::{AggregateError, RootFailure};
use crate::model::AuditTable;
use compact_str::CompactString;
use progress::Reporter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A module root to scan and the identifier its rows are tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSpec {
    pub root_id: String,
    pub path: PathBuf,
}

impl RootSpec {
    pub fn new(root_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            root_id: root_id.into(),
            path: path.into(),
        }
    }

    /// Use the directory's own name as its identifier (`audittest.4gm`),
    /// or the path as written when it has no final component (`.`, `/`).
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let root_id = default_root_id(&path);
        Self { root_id, path }
    }
}

fn default_root_id(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

/// Build root specs for `paths`, keeping identifiers unique.
///
/// The second and later roots that would share an identifier get `#2`,
/// `#3`, … appended, in order.
pub fn root_specs<I, P>(paths: I) -> Vec<RootSpec>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut specs: Vec<RootSpec> = Vec::new();
    for path in paths {
        let mut spec = RootSpec::from_path(path);
        let base = spec.root_id.clone();
        let mut n = 1;
        while specs.iter().any(|s| s.root_id == spec.root_id) {
            n += 1;
            spec.root_id = format!("{base}#{n}");
        }
        specs.push(spec);
    }
    specs
}

/// The merged table plus every root that had to be skipped.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub table: AuditTable,
    pub failures: Vec<RootFailure>,
}

/// Scan every root in order and merge the results.
///
/// A root that is missing or not a directory is logged, recorded in
/// [`Aggregation::failures`], and skipped. The call only fails when no
/// roots were given or every root failed.
pub fn aggregate(
    roots: &[RootSpec],
    classifier: &Classifier,
    reporter: &Reporter,
) -> Result<Aggregation, AggregateError> {
    if roots.is_empty() {
        return Err(AggregateError::NoRoots);
    }

    let mut table = AuditTable::new();
    let mut failures = Vec::new();

    for spec in roots {
        debug!(root = %spec.root_id, path = %spec.path.display(), "scanning module root");

        let records = match walk(&spec.path, classifier, reporter) {
            Ok(records) => records,
            Err(error) => {
                reporter.root_failed(&spec.root_id, &spec.path, &error);
                failures.push(RootFailure {
                    root_id: spec.root_id.clone(),
                    path: spec.path.clone(),
                    error,
                });
                continue;
            }
        };

        let root_tag = CompactString::new(&spec.root_id);
        let tagged = records.map(|mut record| {
            record.root = root_tag.clone();
            record
        });
        let summary = table.push_root(spec.root_id.clone(), spec.path.clone(), tagged);
        reporter.root_scanned(&summary.root_id, &summary.path, summary.files, summary.bytes);
    }

    if failures.len() == roots.len() {
        return Err(AggregateError::AllRootsFailed { failures });
    }

    Ok(Aggregation { table, failures })
}
