/// Data model for an audit run.
///
/// Re-exports the row type, the aggregate table, and supporting helpers.
pub mod file_record;
pub mod size;
pub mod table;

pub use file_record::{extension_of, relative_path_string, FileRecord};
pub use table::{AuditTable, RootSummary};
