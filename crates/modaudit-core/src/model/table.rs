/// The aggregate result of an audit: every row from every root, in order.
///
/// Rows are stored in one flat `Vec<FileRecord>`; each root occupies a
/// contiguous block, and blocks appear in the order roots were supplied.
use super::file_record::FileRecord;
use std::ops::Range;
use std::path::PathBuf;

/// Per-root totals recorded while the table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSummary {
    pub root_id: String,
    pub path: PathBuf,
    pub files: u64,
    pub bytes: u64,
    /// Position of this root's block in [`AuditTable::rows`].
    rows: Range<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct AuditTable {
    rows: Vec<FileRecord>,
    roots: Vec<RootSummary>,
}

impl AuditTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one root's records as a new contiguous block.
    ///
    /// A root that yields nothing still gets a summary entry, so empty
    /// modules stay distinguishable from roots that were never scanned.
    pub fn push_root(
        &mut self,
        root_id: impl Into<String>,
        path: impl Into<PathBuf>,
        records: impl IntoIterator<Item = FileRecord>,
    ) -> &RootSummary {
        let start = self.rows.len();
        let mut bytes = 0u64;
        for record in records {
            bytes += record.size_bytes;
            self.rows.push(record);
        }
        let end = self.rows.len();

        self.roots.push(RootSummary {
            root_id: root_id.into(),
            path: path.into(),
            files: (end - start) as u64,
            bytes,
            rows: start..end,
        });
        &self.roots[self.roots.len() - 1]
    }

    pub fn rows(&self) -> &[FileRecord] {
        &self.rows
    }

    /// Summaries of every root that was scanned, in caller order.
    pub fn roots(&self) -> &[RootSummary] {
        &self.roots
    }

    /// The contiguous block of rows belonging to `root_id`.
    pub fn rows_for(&self, root_id: &str) -> &[FileRecord] {
        self.roots
            .iter()
            .find(|r| r.root_id == root_id)
            .map(|r| &self.rows[r.rows.clone()])
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of `size_bytes` across every row.
    pub fn total_size(&self) -> u64 {
        self.roots.iter().map(|r| r.bytes).sum()
    }
}
