/// Audit configuration.
///
/// Every section has compiled-in defaults for 4GL / Genero module trees, so
/// a config file only needs to name what it overrides:
///
/// ```toml
/// [categories]
/// source = ["4gl", "4gh"]
///
/// [export]
/// binary_extensions = ["pq", "parquet"]
/// compression = "none"
/// ```
use crate::classify::{Category, Classifier};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub categories: CategoryTable,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Extension lists per category. Anything not listed classifies as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    #[serde(default)]
    pub source: Vec<String>,
    #[serde(default)]
    pub compiled: Vec<String>,
    #[serde(default)]
    pub resource: Vec<String>,
    #[serde(default)]
    pub metadata: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Destination extensions (without the dot) that select Parquet.
    #[serde(default = "default_binary_extensions")]
    pub binary_extensions: Vec<String>,

    #[serde(default)]
    pub compression: ParquetCompression,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParquetCompression {
    #[default]
    Snappy,
    None,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn default_binary_extensions() -> Vec<String> {
    strings(&["pq", "parquet"])
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            source: strings(&["4gl", "4gh", "sql", "sch"]),
            compiled: strings(&["4go", "4gi", "42m", "42x", "42r", "42f", "42s", "frm"]),
            resource: strings(&[
                "per", "4rp", "4rdj", "rdd", "4st", "4ad", "4tb", "4tm", "4sm", "str", "msg",
                "iem",
            ]),
            metadata: strings(&["set", "lst", "4pw", "mk", "fgl"]),
        }
    }
}

impl CategoryTable {
    /// Category lists in a fixed order, so validation errors are stable.
    pub fn lists(&self) -> [(Category, &[String]); 4] {
        [
            (Category::Source, self.source.as_slice()),
            (Category::Compiled, self.compiled.as_slice()),
            (Category::Resource, self.resource.as_slice()),
            (Category::Metadata, self.metadata.as_slice()),
        ]
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            binary_extensions: default_binary_extensions(),
            compression: ParquetCompression::default(),
        }
    }
}

impl AuditConfig {
    /// Load from a TOML file. Sections absent from the file keep defaults;
    /// a `[categories]` section replaces only the lists it names.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Partial {
            #[serde(default)]
            categories: Option<PartialCategories>,
            #[serde(default)]
            export: Option<ExportConfig>,
        }

        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct PartialCategories {
            source: Option<Vec<String>>,
            compiled: Option<Vec<String>>,
            resource: Option<Vec<String>>,
            metadata: Option<Vec<String>>,
        }

        let partial: Partial = toml::from_str(text)?;
        let mut config = Self::default();

        if let Some(cats) = partial.categories {
            let table = &mut config.categories;
            if let Some(v) = cats.source {
                table.source = v;
            }
            if let Some(v) = cats.compiled {
                table.compiled = v;
            }
            if let Some(v) = cats.resource {
                table.resource = v;
            }
            if let Some(v) = cats.metadata {
                table.metadata = v;
            }
        }
        if let Some(export) = partial.export {
            config.export = export;
        }

        Ok(config)
    }

    /// Build and validate the classifier described by `[categories]`.
    pub fn classifier(&self) -> Result<Classifier, ConfigError> {
        Classifier::from_table(&self.categories)
    }
}
