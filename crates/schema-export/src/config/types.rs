//! Configuration type definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::export::{ExportOptions, ExportRequest};

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Where the schema comes from.
    pub source: SourceConfig,

    /// What to export and how.
    #[serde(default)]
    pub export: ExportSettings,
}

impl ExportConfig {
    /// Request for the configured tables.
    ///
    /// Returns `None` when no tables are listed, meaning every table the
    /// reader knows.
    pub fn request(&self) -> Option<ExportRequest> {
        if self.export.tables.is_empty() {
            None
        } else {
            Some(ExportRequest::new(self.export.tables.iter().cloned()))
        }
    }

    /// DDL options from the export settings.
    pub fn ddl_options(&self) -> ExportOptions {
        ExportOptions {
            drop_tables: self.export.drop_tables,
            transaction: self.export.transaction,
            defer_foreign_keys: self.export.defer_foreign_keys,
        }
    }
}

/// Schema source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Engine id or alias of the schema ("postgres", "mariadb", "sqlserver", ...).
    /// Selects the dialect for DDL output.
    pub engine: String,

    /// Path to a snapshot document previously written by the JSON export.
    /// Relative paths are resolved against the config file's directory.
    pub snapshot: PathBuf,
}

/// Export behavior configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Tables to export, in output order. Empty exports every table.
    #[serde(default)]
    pub tables: Vec<String>,

    /// Emit drop statements before creating tables (default: true).
    #[serde(default = "default_true")]
    pub drop_tables: bool,

    /// Wrap DDL in a transaction (default: true).
    #[serde(default = "default_true")]
    pub transaction: bool,

    /// Add every foreign key with ALTER TABLE after all tables (default: false).
    #[serde(default)]
    pub defer_foreign_keys: bool,

    /// Pretty-print JSON output (default: false).
    #[serde(default)]
    pub pretty: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            drop_tables: true,
            transaction: true,
            defer_foreign_keys: false,
            pretty: false,
        }
    }
}

fn default_true() -> bool {
    true
}
