//! In-memory [`SchemaReader`] backed by a [`SchemaDocument`].
//!
//! Serves a snapshot written by the structured exporter, so a schema
//! captured from one engine can be re-exported as DDL for another.

use std::path::Path;

use chrono::Utc;
use tracing::debug;

use crate::core::schema::{Column, ForeignKey, Index, Table, TableEntry, TableKind};
use crate::core::traits::SchemaReader;
use crate::error::{ReaderResult, Result};
use crate::export::{SchemaDocument, TableDocument};

/// Schema reader over an in-memory snapshot.
#[derive(Debug, Clone)]
pub struct MemoryReader {
    engine: String,
    document: SchemaDocument,
    views: Vec<String>,
}

impl MemoryReader {
    /// Serve `document` as a schema of `engine`.
    pub fn new(engine: impl Into<String>, document: SchemaDocument) -> Self {
        Self {
            engine: engine.into(),
            document,
            views: Vec::new(),
        }
    }

    pub fn from_tables(engine: impl Into<String>, tables: Vec<Table>) -> Self {
        Self::new(engine, SchemaDocument::from_tables(tables, Utc::now()))
    }

    /// Load a snapshot document from a JSON file.
    pub fn from_json_file(engine: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = SchemaDocument::load(path)?;
        debug!(
            "Loaded snapshot {} ({} tables)",
            path.display(),
            document.tables.len()
        );
        Ok(Self::new(engine, document))
    }

    /// List a view alongside the tables. Views have no definition here.
    pub fn with_view(mut self, name: impl Into<String>) -> Self {
        self.views.push(name.into());
        self
    }

    pub fn document(&self) -> &SchemaDocument {
        &self.document
    }

    fn table(&self, name: &str) -> Option<&TableDocument> {
        self.document.tables.get(name)
    }
}

impl SchemaReader for MemoryReader {
    fn engine(&self) -> &str {
        &self.engine
    }

    fn tables(&self) -> ReaderResult<Option<Vec<TableEntry>>> {
        let mut entries: Vec<TableEntry> = self.document.tables.names().map(TableEntry::table).collect();
        entries.extend(self.views.iter().map(|name| TableEntry {
            name: name.clone(),
            kind: TableKind::View,
        }));
        Ok(Some(entries))
    }

    fn columns(&self, table: &str, fields: Option<&[String]>) -> ReaderResult<Option<Vec<Column>>> {
        let Some(doc) = self.table(table) else {
            return Ok(None);
        };
        let Some(fields) = fields else {
            return Ok(Some(doc.columns.clone()));
        };

        let mut projected = Vec::with_capacity(fields.len());
        for field in fields {
            match doc.columns.iter().find(|c| &c.name == field) {
                Some(col) => projected.push(col.clone()),
                None => return Ok(None),
            }
        }
        Ok(Some(projected))
    }

    fn indexes(&self, table: &str) -> ReaderResult<Option<Vec<Index>>> {
        Ok(self.table(table).map(|doc| doc.indexes.clone()))
    }

    fn foreign_keys(&self, table: &str) -> ReaderResult<Option<Vec<ForeignKey>>> {
        Ok(self.table(table).map(|doc| doc.foreign_keys.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::LogicalType;
    use crate::error::ExportError;
    use crate::export::{fixtures, DdlExporter, ExportRequest, StructuredExporter};

    #[test]
    fn test_lists_tables_then_views() {
        let reader = fixtures::shop("postgres").with_view("v_orders");
        let entries = reader.tables().unwrap().unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["users", "orders", "order_items", "v_orders"]);
        assert_eq!(entries[3].kind, TableKind::View);
    }

    #[test]
    fn test_columns_projection() {
        let reader = fixtures::shop("postgres");
        let fields = vec!["status".to_string(), "id".to_string()];
        let cols = reader.columns("users", Some(&fields)).unwrap().unwrap();
        let names: Vec<&str> = cols.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["status", "id"]);

        let missing = vec!["id".to_string(), "nickname".to_string()];
        assert!(reader.columns("users", Some(&missing)).unwrap().is_none());
        assert!(reader.columns("ghosts", None).unwrap().is_none());
    }

    #[test]
    fn test_indexes_and_foreign_keys() {
        let reader = fixtures::shop("postgres");
        assert_eq!(reader.indexes("users").unwrap().unwrap().len(), 2);
        assert!(reader.foreign_keys("users").unwrap().unwrap().is_empty());
        assert_eq!(reader.foreign_keys("orders").unwrap().unwrap()[0].referenced_table, "users");
        assert!(reader.indexes("ghosts").unwrap().is_none());
    }

    #[test]
    fn test_field_type_follows_engine() {
        let reader = MemoryReader::from_tables("sqlserver", Vec::new());
        assert_eq!(reader.field_type("nvarchar(max)").as_deref(), Some("text"));
        assert_eq!(reader.field_type("bit").as_deref(), Some("boolean"));
    }

    #[test]
    fn test_snapshot_file_round_trip_across_dialects() {
        let source = fixtures::shop("mysql");
        let request = ExportRequest::new(["users", "orders", "order_items"]);
        let json = StructuredExporter::new(&source).to_json(&request, true).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, json).unwrap();

        let reader = MemoryReader::from_json_file("postgres", &path).unwrap();
        assert_eq!(reader.document().table("users"), Some(fixtures::users()));

        let script = DdlExporter::new(&reader).unwrap().export(&request).unwrap();
        assert!(script.render().contains("CREATE TABLE \"order_items\""));
    }

    #[test]
    fn test_from_json_file_errors() {
        let err = MemoryReader::from_json_file("postgres", "/nonexistent/schema.json").unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"version\": 1}").unwrap();
        let err = MemoryReader::from_json_file("postgres", &path).unwrap_err();
        assert!(matches!(err, ExportError::Json(_)));
    }

    #[test]
    fn test_new_from_document() {
        let doc = SchemaDocument::from_tables(
            vec![Table::new("t").with_column(Column::new("id", LogicalType::Uuid))],
            Utc::now(),
        );
        let reader = MemoryReader::new("pg", doc);
        assert_eq!(reader.engine(), "pg");
        assert_eq!(reader.tables().unwrap().unwrap(), vec![TableEntry::table("t")]);
    }
}
