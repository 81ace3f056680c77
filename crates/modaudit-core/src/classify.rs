/// File classification by extension.
///
/// Groups module files into the coarse roles used downstream: 4GL source,
/// compiled output, forms/reports/resources, and module metadata.
/// The mapping itself is data (see [`crate::config::CategoryTable`]); this
/// module only owns the lookup.
use crate::config::CategoryTable;
use crate::error::ConfigError;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Broad role of a file within a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Source,
    Compiled,
    Resource,
    Metadata,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Source,
        Self::Compiled,
        Self::Resource,
        Self::Metadata,
        Self::Other,
    ];

    /// Keyword written to output files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "SOURCE",
            Self::Compiled => "COMPILED",
            Self::Resource => "RESOURCE",
            Self::Metadata => "METADATA",
            Self::Other => "OTHER",
        }
    }

    /// Human-readable label for the console summary.
    pub fn label(self) -> &'static str {
        match self {
            Self::Source => "Source",
            Self::Compiled => "Compiled",
            Self::Resource => "Resources",
            Self::Metadata => "Metadata",
            Self::Other => "Other",
        }
    }
}

/// Longest extension the classifier can match. Anything longer is `Other`.
pub const MAX_EXTENSION_LEN: usize = 16;

/// Extension → category lookup built from a validated [`CategoryTable`].
#[derive(Debug, Clone)]
pub struct Classifier {
    map: HashMap<CompactString, Category>,
}

impl Classifier {
    /// Build a classifier, rejecting empty or over-long extensions and
    /// extensions claimed by more than one category.
    pub fn from_table(table: &CategoryTable) -> Result<Self, ConfigError> {
        let mut map: HashMap<CompactString, Category> = HashMap::new();

        for (category, extensions) in table.lists() {
            for raw in extensions {
                let ext = normalise(raw);
                if ext.is_empty() {
                    return Err(ConfigError::EmptyExtension {
                        category: category.as_str(),
                    });
                }
                if ext.len() > MAX_EXTENSION_LEN {
                    return Err(ConfigError::ExtensionTooLong {
                        extension: ext.to_string(),
                        max: MAX_EXTENSION_LEN,
                    });
                }
                match map.get(&ext) {
                    Some(&existing) if existing != category => {
                        return Err(ConfigError::Conflict {
                            extension: ext.to_string(),
                            first: existing.as_str(),
                            second: category.as_str(),
                        });
                    }
                    _ => {
                        map.insert(ext, category);
                    }
                }
            }
        }

        Ok(Self { map })
    }

    /// Categorise an extension (without the leading dot).
    ///
    /// Total and case-insensitive: every input maps to exactly one
    /// category, with `Other` for anything unrecognised, including `""`.
    ///
    /// ASCII input is lowercased into a fixed-size stack buffer rather than
    /// a fresh `String`; this runs once per scanned file.
    pub fn classify(&self, ext: &str) -> Category {
        let bytes = ext.as_bytes();
        if bytes.is_empty() || bytes.len() > MAX_EXTENSION_LEN {
            return Category::Other;
        }

        if !ext.is_ascii() {
            return self.lookup(&ext.to_lowercase());
        }

        let mut lower = [0u8; MAX_EXTENSION_LEN];
        for (dest, &src) in lower.iter_mut().zip(bytes) {
            *dest = src.to_ascii_lowercase();
        }
        match std::str::from_utf8(&lower[..bytes.len()]) {
            Ok(s) => self.lookup(s),
            Err(_) => Category::Other,
        }
    }

    fn lookup(&self, lower: &str) -> Category {
        self.map.get(lower).copied().unwrap_or(Category::Other)
    }

    /// Number of extensions with an explicit mapping.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        // The built-in table is covered by `default_table_is_valid`.
        Self::from_table(&CategoryTable::default()).unwrap_or_else(|_| Self {
            map: HashMap::new(),
        })
    }
}

/// Trim, strip a leading `.`, and lowercase a configured extension.
fn normalise(raw: &str) -> CompactString {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('.').unwrap_or(trimmed);
    CompactString::new(trimmed.to_lowercase())
}

/// Categorise an extension using the built-in 4GL mapping.
pub fn classify(ext: &str) -> Category {
    static DEFAULT: OnceLock<Classifier> = OnceLock::new();
    DEFAULT.get_or_init(Classifier::default).classify(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        let classifier = Classifier::from_table(&CategoryTable::default())
            .expect("built-in category table must validate");
        assert!(!classifier.is_empty());
    }

    #[test]
    fn classify_4gl_source() {
        for ext in &["4gl", "4gh"] {
            assert_eq!(classify(ext), Category::Source, "expected Source for .{ext}");
        }
    }

    #[test]
    fn classify_compiled_output() {
        for ext in &["4go", "42m", "42x", "42f"] {
            assert_eq!(
                classify(ext),
                Category::Compiled,
                "expected Compiled for .{ext}"
            );
        }
    }

    #[test]
    fn classify_forms_and_reports_as_resources() {
        for ext in &["per", "4rp", "4st"] {
            assert_eq!(
                classify(ext),
                Category::Resource,
                "expected Resource for .{ext}"
            );
        }
    }

    #[test]
    fn classify_module_lists_as_metadata() {
        assert_eq!(classify("set"), Category::Metadata);
        assert_eq!(classify("4pw"), Category::Metadata);
    }

    #[test]
    fn unknown_and_empty_extensions_are_other() {
        assert_eq!(classify("xyz"), Category::Other);
        assert_eq!(classify(""), Category::Other);
        assert_eq!(classify("a-very-long-extension-name"), Category::Other);
        assert_eq!(classify("ünï"), Category::Other);
    }

    /// Extension matching must be case-insensitive so "4GL" == "4gl".
    #[test]
    fn classify_case_insensitive() {
        assert_eq!(classify("4GL"), Category::Source);
        assert_eq!(classify("4Go"), Category::Compiled);
        assert_eq!(classify("SET"), Category::Metadata);
    }

    #[test]
    fn classify_is_deterministic() {
        let classifier = Classifier::default();
        for ext in ["4gl", "PER", "", "zip", "42M"] {
            let first = classifier.classify(ext);
            for _ in 0..10 {
                assert_eq!(classifier.classify(ext), first);
            }
            assert!(Category::ALL.contains(&first));
        }
    }

    #[test]
    fn configured_extensions_are_normalised() {
        let table = CategoryTable {
            source: vec![" .SRC ".into()],
            compiled: vec![],
            resource: vec![],
            metadata: vec![],
        };
        let classifier = Classifier::from_table(&table).unwrap();
        assert_eq!(classifier.classify("src"), Category::Source);
        assert_eq!(classifier.classify("4gl"), Category::Other);
    }

    #[test]
    fn conflicting_extension_is_rejected() {
        let table = CategoryTable {
            source: vec!["4gl".into()],
            compiled: vec!["4GL".into()],
            resource: vec![],
            metadata: vec![],
        };
        let err = Classifier::from_table(&table).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Conflict { ref extension, first: "SOURCE", second: "COMPILED" }
                if extension == "4gl"
        ));
    }

    #[test]
    fn empty_extension_is_rejected() {
        let table = CategoryTable {
            source: vec![],
            compiled: vec![],
            resource: vec![".".into()],
            metadata: vec![],
        };
        assert!(matches!(
            Classifier::from_table(&table),
            Err(ConfigError::EmptyExtension { category: "RESOURCE" })
        ));
    }

    /// Listing the same extension twice under one category is harmless.
    #[test]
    fn duplicate_within_category_is_allowed() {
        let table = CategoryTable {
            source: vec!["4gl".into(), "4GL".into()],
            compiled: vec![],
            resource: vec![],
            metadata: vec![],
        };
        let classifier = Classifier::from_table(&table).unwrap();
        assert_eq!(classifier.len(), 1);
    }
}
