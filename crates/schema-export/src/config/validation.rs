//! Configuration validation.

use std::collections::HashSet;

use super::ExportConfig;
use crate::drivers::{normalize_engine, SUPPORTED_ENGINES};
use crate::error::{ExportError, Result};

/// Validate the configuration.
pub fn validate(config: &ExportConfig) -> Result<()> {
    // Source validation
    if config.source.engine.trim().is_empty() {
        return Err(ExportError::Config("source.engine is required".into()));
    }
    if normalize_engine(&config.source.engine).is_none() {
        return Err(ExportError::Config(format!(
            "source.engine '{}' is not supported (expected one of: {})",
            config.source.engine,
            SUPPORTED_ENGINES.join(", ")
        )));
    }
    if config.source.snapshot.as_os_str().is_empty() {
        return Err(ExportError::Config("source.snapshot is required".into()));
    }

    // Export validation
    let mut seen = HashSet::new();
    for table in &config.export.tables {
        if table.trim().is_empty() {
            return Err(ExportError::Config(
                "export.tables cannot contain an empty name".into(),
            ));
        }
        if !seen.insert(table.as_str()) {
            return Err(ExportError::Config(format!(
                "export.tables lists '{}' more than once",
                table
            )));
        }
    }

    Ok(())
}
