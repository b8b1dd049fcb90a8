//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use std::path::Path;

impl ExportConfig {
    /// Load configuration from a YAML file.
    ///
    /// A relative `source.snapshot` is resolved against the directory that
    /// holds the config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        if config.source.snapshot.is_relative() {
            if let Some(dir) = path.parent() {
                config.source.snapshot = dir.join(&config.source.snapshot);
            }
        }
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ExportConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_from_yaml_with_defaults() {
        let yaml = r#"
source:
  engine: mariadb
  snapshot: schema.json
"#;
        let config = ExportConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.source.engine, "mariadb");
        assert!(config.export.tables.is_empty());
        assert!(config.request().is_none());

        let options = config.ddl_options();
        assert!(options.drop_tables);
        assert!(options.transaction);
        assert!(!options.defer_foreign_keys);
        assert!(!config.export.pretty);
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = r#"
source:
  engine: sqlserver
  snapshot: /var/lib/schema.json
export:
  tables: [users, orders]
  drop_tables: false
  transaction: false
  defer_foreign_keys: true
  pretty: true
"#;
        let config = ExportConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.request().unwrap().table_names(), vec!["users", "orders"]);
        let options = config.ddl_options();
        assert!(!options.drop_tables);
        assert!(!options.transaction);
        assert!(options.defer_foreign_keys);
        assert!(config.export.pretty);
    }

    #[test]
    fn test_from_yaml_rejects_invalid() {
        let err = ExportConfig::from_yaml("source:\n  engine: db2\n  snapshot: s.json\n").unwrap_err();
        assert!(matches!(err, ExportError::Config(_)));

        let err = ExportConfig::from_yaml("source: [").unwrap_err();
        assert!(matches!(err, ExportError::Yaml(_)));
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG_ERROR);
    }

    #[test]
    fn test_load_resolves_snapshot_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "source:\n  engine: pg\n  snapshot: snap/schema.json").unwrap();

        let config = ExportConfig::load(&path).unwrap();
        assert_eq!(config.source.snapshot, dir.path().join("snap/schema.json"));
    }

    #[test]
    fn test_load_keeps_absolute_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.yaml");
        std::fs::write(&path, "source:\n  engine: pg\n  snapshot: /tmp/schema.json\n").unwrap();

        let config = ExportConfig::load(&path).unwrap();
        assert_eq!(config.source.snapshot, PathBuf::from("/tmp/schema.json"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ExportConfig::load("/nonexistent/export.yaml").unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
