/// Per-category file counts and byte totals over an audit table.
use crate::classify::Category;
use crate::model::AuditTable;
use std::collections::HashMap;

/// Size and count totals for a single category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    pub category: Category,
    pub total_size: u64,
    pub file_count: u64,
}

/// Totals for every category that has at least one file, largest first.
///
/// Ties on size are broken by category order so the output is stable.
pub fn analyse_categories(table: &AuditTable) -> Vec<CategoryStats> {
    let mut map: HashMap<Category, CategoryStats> = HashMap::with_capacity(Category::ALL.len());

    for record in table.rows() {
        let entry = map.entry(record.category).or_insert_with(|| CategoryStats {
            category: record.category,
            total_size: 0,
            file_count: 0,
        });
        entry.total_size += record.size_bytes;
        entry.file_count += 1;
    }

    let mut results: Vec<CategoryStats> = map.into_values().collect();
    results.sort_by(|a, b| {
        b.total_size
            .cmp(&a.total_size)
            .then(a.category.cmp(&b.category))
    });
    results
}
