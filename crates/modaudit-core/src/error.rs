/// Error taxonomy for every stage of an audit.
///
/// Recoverability is encoded in where each type is allowed to surface:
///
/// - [`FileStatError`] never leaves the walker (logged, file skipped).
/// - [`ScanError`] never leaves the aggregator unless every root failed.
/// - [`SerializationError`] is recovered once by the CSV fallback.
/// - [`AggregateError`], [`ExportError`], and [`ConfigError`] are fatal.
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Root-level walker failure.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("root directory not found or not a directory: {}", path.display())]
    RootNotFound { path: PathBuf },
}

/// Metadata read failure for a single file.
#[derive(Debug, Error)]
#[error("cannot stat {}: {source}", path.display())]
pub struct FileStatError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// A root the aggregator had to skip.
#[derive(Debug)]
pub struct RootFailure {
    pub root_id: String,
    pub path: PathBuf,
    pub error: ScanError,
}

impl fmt::Display for RootFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.root_id, self.error)
    }
}

/// Multi-root aggregation failure.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("no module roots were supplied")]
    NoRoots,

    #[error("all {} module roots failed: {}", failures.len(), join_failures(failures))]
    AllRootsFailed { failures: Vec<RootFailure> },
}

fn join_failures(failures: &[RootFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// An encoder could not serialize the table.
///
/// Raised by a [`crate::export::TableFormat`] once the destination file is
/// already open, so it always means "this format failed", never "this path
/// is unwritable".
#[derive(Debug, Error)]
#[error("{format} serialization failed: {source}")]
pub struct SerializationError {
    pub format: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl SerializationError {
    pub fn new(
        format: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            format,
            source: source.into(),
        }
    }
}

/// Fatal export failure. Nothing usable was written to the destination.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot open destination {}: {source}", path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("writing {}: {source}", path.display())]
    Text {
        path: PathBuf,
        #[source]
        source: SerializationError,
    },

    #[error("writing {}: {binary}; CSV fallback also failed: {text}", path.display())]
    FallbackFailed {
        path: PathBuf,
        binary: SerializationError,
        #[source]
        text: SerializationError,
    },
}

/// Configuration could not be loaded or is inconsistent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("empty extension in the `{category}` list")]
    EmptyExtension { category: &'static str },

    #[error("extension `{extension}` is longer than {max} bytes")]
    ExtensionTooLong { extension: String, max: usize },

    #[error("extension `{extension}` is listed under both `{first}` and `{second}`")]
    Conflict {
        extension: String,
        first: &'static str,
        second: &'static str,
    },
}

/// Umbrella error for the end-to-end pipeline.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl AuditError {
    /// Process exit code for this failure: 2 when nothing could be scanned,
    /// 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Aggregate(_) => 2,
            Self::Config(_) | Self::Export(_) => 1,
        }
    }
}
