/// A single row of the audit table.
///
/// One `FileRecord` is produced per regular file discovered under a module
/// root. Field order here is the column order of every output format.
use crate::classify::Category;
use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Component, Path};

/// Column names in output order.
pub const COLUMNS: [&str; 6] = [
    "root",
    "relative_path",
    "extension",
    "category",
    "size_bytes",
    "modified_at",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Identifier of the module root this file was found under.
    pub root: CompactString,

    /// Path relative to the root, always `/`-separated.
    pub relative_path: String,

    /// Lower-cased extension without the dot; empty when there is none.
    pub extension: CompactString,

    pub category: Category,

    /// Exact byte count at scan time.
    pub size_bytes: u64,

    /// Last modification time, normalised to UTC.
    pub modified_at: DateTime<Utc>,
}

/// Lower-cased extension of a file name, without the leading dot.
///
/// Follows the "last dot" rule: `main.4gl` → `4gl`, `a.tar.gz` → `gz`.
/// A name whose only dot is the first character (`.profile`) has no
/// extension, and neither does a name ending in a dot.
pub fn extension_of(file_name: &str) -> CompactString {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < file_name.len() => {
            CompactString::new(file_name[idx + 1..].to_lowercase())
        }
        _ => CompactString::default(),
    }
}

/// Render `path` relative to `root` with `/` separators on every platform.
///
/// Returns `None` when `path` does not live under `root`. Distinct paths
/// always render differently: on Unix, bytes that are not valid UTF-8
/// become `\xNN` and a literal backslash becomes `\\`.
pub fn relative_path_string(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut out = String::new();
    for part in rel.components().filter_map(|c| match c {
        Component::Normal(part) => Some(part),
        _ => None,
    }) {
        if !out.is_empty() {
            out.push('/');
        }
        push_component(&mut out, part);
    }
    Some(out)
}

#[cfg(unix)]
fn push_component(out: &mut String, part: &OsStr) {
    use std::os::unix::ffi::OsStrExt;

    let mut bytes = part.as_bytes();
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                push_escaped(out, valid);
                return;
            }
            Err(err) => {
                let (valid, tail) = bytes.split_at(err.valid_up_to());
                push_escaped(out, std::str::from_utf8(valid).unwrap_or_default());
                let bad_len = err.error_len().unwrap_or(tail.len());
                let (bad, rest) = tail.split_at(bad_len);
                for b in bad {
                    out.push_str(&format!("\\x{b:02x}"));
                }
                bytes = rest;
            }
        }
    }
}

#[cfg(unix)]
fn push_escaped(out: &mut String, s: &str) {
    for ch in s.chars() {
        if ch == '\\' {
            out.push_str("\\\\");
        } else {
            out.push(ch);
        }
    }
}

#[cfg(not(unix))]
fn push_component(out: &mut String, part: &OsStr) {
    out.push_str(&part.to_string_lossy());
}
