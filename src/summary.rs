//! Console summary printed after an audit.

use modaudit_core::analysis::analyse_categories;
use modaudit_core::export::OutputFormat;
use modaudit_core::model::size::{format_count, format_size};
use modaudit_core::AuditReport;
use std::io::{self, Write};

pub fn print(out: &mut impl Write, report: &AuditReport, preview: usize) -> io::Result<()> {
    let table = &report.table;

    for root in table.roots() {
        writeln!(out, "scanned: {}", root.path.display())?;
        writeln!(out, "files found: {}", format_count(root.files))?;

        let rows = table.rows_for(&root.root_id);
        if preview > 0 && !rows.is_empty() {
            writeln!(
                out,
                "  {:<40} {:<10} {:>10}  {}",
                "relative_path", "category", "size_bytes", "modified_at"
            )?;
            for row in rows.iter().take(preview) {
                writeln!(
                    out,
                    "  {:<40} {:<10} {:>10}  {}",
                    row.relative_path,
                    row.category.as_str(),
                    row.size_bytes,
                    row.modified_at.format("%Y-%m-%d %H:%M:%S")
                )?;
            }
            if rows.len() > preview {
                writeln!(out, "  … {} more", format_count((rows.len() - preview) as u64))?;
            }
        }
    }

    for failure in &report.failures {
        writeln!(out, "skipped: {} ({})", failure.path.display(), failure.error)?;
    }

    let stats = analyse_categories(table);
    if !stats.is_empty() {
        writeln!(out)?;
        for s in &stats {
            writeln!(
                out,
                "{:<10} {:>8} files {:>10}",
                s.category.label(),
                format_count(s.file_count),
                format_size(s.total_size)
            )?;
        }
    }

    if let Some(export) = &report.export {
        match (&export.fallback, export.format) {
            (Some(_), _) => writeln!(out, "wrote: {} (CSV fallback)", export.path.display())?,
            (None, OutputFormat::Parquet) => {
                writeln!(out, "wrote: {} (Parquet)", export.path.display())?
            }
            (None, OutputFormat::Csv) => writeln!(out, "wrote: {}", export.path.display())?,
        }
    }

    writeln!(
        out,
        "total files across modules: {} ({})",
        format_count(table.len() as u64),
        format_size(table.total_size())
    )
}
