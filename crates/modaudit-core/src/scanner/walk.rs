/// Deterministic single-root walker built on `jwalk`.
///
/// `jwalk` runs in serial mode here: an audit is single-threaded, and a
/// serial walk on the calling thread keeps output order a pure function of
/// the tree. Order is imposed in a `process_read_dir` callback rather than
/// relying on whatever the OS returns from `readdir`:
///
/// 1. within a directory, non-directory entries first, by name (bytewise);
/// 2. then subdirectories by name, each fully descended before the next.
///
/// Directory symlinks are never followed, so cycles are impossible. A
/// symlink to a regular file is reported with its target's metadata.
use crate::classify::Classifier;
use crate::error::{FileStatError, ScanError};
use crate::model::{extension_of, relative_path_string, FileRecord};
use crate::scanner::progress::Reporter;
use chrono::{DateTime, TimeDelta, Utc};
use compact_str::CompactString;
use std::cmp::Ordering;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

type EntryResult = Result<jwalk::DirEntry<((), ())>, jwalk::Error>;

/// Start a fresh scan of `root`.
///
/// Fails immediately with [`ScanError::RootNotFound`] when `root` does not
/// exist or is not a directory, so callers can tell a bad path from an
/// empty module. Every call re-scans from scratch.
pub fn walk<'a>(
    root: &Path,
    classifier: &'a Classifier,
    reporter: &'a Reporter,
) -> Result<RootWalk<'a>, ScanError> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        _ => {
            return Err(ScanError::RootNotFound {
                path: root.to_path_buf(),
            })
        }
    }

    // A root given as a symlink is resolved once; links below it are not.
    let scan_root = match fs::symlink_metadata(root) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf())
        }
        _ => root.to_path_buf(),
    };

    let entries = jwalk::WalkDir::new(&scan_root)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial)
        .process_read_dir(|_depth, _path, _state, children| {
            children.sort_by(traversal_order);
        })
        .into_iter();

    Ok(RootWalk {
        root: scan_root,
        entries,
        classifier,
        reporter,
    })
}

/// Files before directories, then by name. Unreadable entries sort last
/// so they cannot disturb the order of readable siblings.
fn traversal_order(a: &EntryResult, b: &EntryResult) -> Ordering {
    match (a, b) {
        (Ok(a), Ok(b)) => {
            let key_a = (a.file_type().is_dir(), a.file_name());
            let key_b = (b.file_type().is_dir(), b.file_name());
            key_a.cmp(&key_b)
        }
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => Ordering::Equal,
    }
}

/// Lazy sequence of records for one root.
///
/// Root identity is attached later by the aggregator; records yielded here
/// carry an empty `root`.
pub struct RootWalk<'a> {
    root: PathBuf,
    entries: jwalk::DirEntryIter<((), ())>,
    classifier: &'a Classifier,
    reporter: &'a Reporter,
}

impl RootWalk<'_> {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stat one non-directory entry and turn it into a record.
    ///
    /// `Ok(None)` means the entry is deliberately not a row (special file,
    /// broken link, link to a directory).
    fn record_for(
        &self,
        path: &Path,
        file_name: &str,
        is_symlink: bool,
    ) -> Result<Option<FileRecord>, FileStatError> {
        let meta = if is_symlink {
            match fs::metadata(path) {
                Ok(meta) => meta,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    self.reporter.ignored(path, "broken symlink");
                    return Ok(None);
                }
                Err(source) => {
                    return Err(FileStatError {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        } else {
            fs::symlink_metadata(path).map_err(|source| FileStatError {
                path: path.to_path_buf(),
                source,
            })?
        };

        if !meta.is_file() {
            self.reporter.ignored(path, "non-regular file");
            return Ok(None);
        }

        let modified_at = modified_utc(&meta).map_err(|source| FileStatError {
            path: path.to_path_buf(),
            source,
        })?;

        let Some(relative_path) = relative_path_string(&self.root, path) else {
            self.reporter.ignored(path, "entry outside root");
            return Ok(None);
        };

        let extension = extension_of(file_name);
        let category = self.classifier.classify(&extension);

        Ok(Some(FileRecord {
            root: CompactString::default(),
            relative_path,
            extension,
            category,
            size_bytes: meta.len(),
            modified_at,
        }))
    }
}

fn modified_utc(meta: &Metadata) -> io::Result<DateTime<Utc>> {
    system_time_utc(meta.modified()?)
}

/// Convert to UTC. A time chrono cannot represent is an error for this
/// file only.
fn system_time_utc(time: SystemTime) -> io::Result<DateTime<Utc>> {
    let converted = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs())
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, after.subsec_nanos())),
        Err(before) => {
            let before = before.duration();
            i64::try_from(before.as_nanos())
                .ok()
                .and_then(|nanos| {
                    DateTime::<Utc>::UNIX_EPOCH.checked_sub_signed(TimeDelta::nanoseconds(nanos))
                })
                .or_else(|| {
                    i64::try_from(before.as_secs())
                        .ok()
                        .and_then(|secs| DateTime::from_timestamp(-secs, 0))
                })
        }
    };
    converted.ok_or_else(|| {
        io::Error::other(format!("modification time {time:?} is out of range"))
    })
}

impl Iterator for RootWalk<'_> {
    type Item = FileRecord;

    fn next(&mut self) -> Option<FileRecord> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    // A failed directory read loses that subtree only.
                    self.reporter.unreadable_entry(err.path(), &err.to_string());
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }

            let path = entry.path();
            if !file_type.is_file() && !file_type.is_symlink() {
                self.reporter.ignored(&path, "special file");
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            match self.record_for(&path, &file_name, file_type.is_symlink()) {
                Ok(Some(record)) => return Some(record),
                Ok(None) => continue,
                Err(err) => {
                    self.reporter.file_skipped(&err);
                    continue;
                }
            }
        }
    }
}
