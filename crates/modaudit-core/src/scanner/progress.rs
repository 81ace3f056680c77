/// Audit progress reporting — the log sink passed into every component.
///
/// A [`Reporter`] writes a `tracing` record for each notable event and, when
/// constructed with a channel, also forwards a typed [`AuditEvent`] so a
/// front end or a test can observe exactly what was skipped or degraded.
use crate::error::{FileStatError, SerializationError};
use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Events emitted while an audit runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    /// A root finished scanning.
    RootScanned {
        root_id: String,
        path: PathBuf,
        files: u64,
        bytes: u64,
    },
    /// A root was skipped because it is missing or not a directory.
    RootFailed {
        root_id: String,
        path: PathBuf,
        message: String,
    },
    /// A file or directory inside a root could not be read and was skipped.
    EntrySkipped { path: PathBuf, message: String },
    /// Binary export failed and the table is being rewritten as text.
    FormatFallback {
        destination: PathBuf,
        from: &'static str,
        to: &'static str,
        message: String,
    },
    /// The table was written.
    Exported {
        destination: PathBuf,
        format: &'static str,
        rows: usize,
    },
}

/// Explicit logging dependency for the walker, aggregator, and exporter.
///
/// Cloning is cheap; clones share the same channel.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    tx: Option<Sender<AuditEvent>>,
}

impl Reporter {
    /// Log through `tracing` only.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Log through `tracing` and forward events to `tx`.
    ///
    /// Sending never blocks: if a bounded channel is full the event is
    /// dropped, the log line is still written.
    pub fn with_channel(tx: Sender<AuditEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    fn emit(&self, event: AuditEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.try_send(event);
        }
    }

    pub fn root_scanned(&self, root_id: &str, path: &Path, files: u64, bytes: u64) {
        info!(root = root_id, path = %path.display(), files, bytes, "scanned module root");
        self.emit(AuditEvent::RootScanned {
            root_id: root_id.to_string(),
            path: path.to_path_buf(),
            files,
            bytes,
        });
    }

    pub fn root_failed(&self, root_id: &str, path: &Path, err: &dyn std::error::Error) {
        error!(root = root_id, path = %path.display(), "{err}");
        self.emit(AuditEvent::RootFailed {
            root_id: root_id.to_string(),
            path: path.to_path_buf(),
            message: err.to_string(),
        });
    }

    pub fn file_skipped(&self, err: &FileStatError) {
        warn!("skipping unreadable entry: {err}");
        self.emit(AuditEvent::EntrySkipped {
            path: err.path.clone(),
            message: err.source.to_string(),
        });
    }

    /// The walker could not read an entry. For a directory listing the
    /// whole subtree is lost.
    pub fn unreadable_entry(&self, path: Option<&Path>, message: &str) {
        let shown = path.map(|p| p.display().to_string()).unwrap_or_default();
        warn!("skipping unreadable entry {shown}: {message}");
        self.emit(AuditEvent::EntrySkipped {
            path: path.map(Path::to_path_buf).unwrap_or_default(),
            message: message.to_string(),
        });
    }

    /// Entries skipped by policy (special files, broken links) are only
    /// visible at debug level.
    pub fn ignored(&self, path: &Path, reason: &str) {
        debug!(path = %path.display(), "ignoring {reason}");
    }

    pub fn fallback(&self, destination: &Path, to: &'static str, err: &SerializationError) {
        warn!(
            destination = %destination.display(),
            "{err}; falling back to {to}"
        );
        self.emit(AuditEvent::FormatFallback {
            destination: destination.to_path_buf(),
            from: err.format,
            to,
            message: err.to_string(),
        });
    }

    pub fn exported(&self, destination: &Path, format: &'static str, rows: usize) {
        info!(destination = %destination.display(), format, rows, "wrote audit table");
        self.emit(AuditEvent::Exported {
            destination: destination.to_path_buf(),
            format,
            rows,
        });
    }
}
