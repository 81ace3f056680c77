/// modaudit Core — scanning, classification, export, and data model.
///
/// This crate contains all business logic with zero CLI dependencies.
/// The `modaudit` binary is a thin front end over [`audit::run`].
///
/// # Modules
///
/// - [`model`] — `FileRecord`, `AuditTable`, and size formatting helpers.
/// - [`classify`] — Extension → category mapping.
/// - [`config`] — TOML-backed configuration (category table, export options).
/// - [`scanner`] — Deterministic per-root walker and the multi-root aggregator.
/// - [`export`] — Parquet writer with CSV fallback.
/// - [`analysis`] — Post-scan summaries (per-category totals).
/// - [`audit`] — The end-to-end pipeline: aggregate, then export.
/// - [`error`] — Typed errors for every stage.
pub mod analysis;
pub mod audit;
pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod scanner;

pub use audit::{run, AuditReport, AuditRequest};
pub use classify::{classify, Category, Classifier};
pub use config::AuditConfig;
pub use error::{AggregateError, AuditError, ConfigError, ExportError, ScanError};
pub use model::{AuditTable, FileRecord};
pub use scanner::progress::{AuditEvent, Reporter};
pub use scanner::{aggregate, walk, RootSpec};
