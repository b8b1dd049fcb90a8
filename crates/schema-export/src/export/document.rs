//! Structured export: the schema as a versioned JSON document.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "generated": "2024-05-01T12:00:00Z",
//!   "tables": {
//!     "users": { "columns": [...], "indexes": [...], "foreignKeys": [...] }
//!   }
//! }
//! ```
//!
//! Tables keep request order. Every column field is always present, `null`
//! when unset, so the pretty and compact forms carry the same keys.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, SubsecRound, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::info;

use crate::core::schema::{Column, ForeignKey, Index, Table};
use crate::core::traits::SchemaReader;
use crate::error::Result;

use super::{fetch_tables, ExportRequest};

/// Document format version written by this crate.
pub const DOCUMENT_VERSION: &str = "1.0";

/// Top-level structured export record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub version: String,

    /// Generation time, UTC, whole seconds.
    #[serde(with = "rfc3339_seconds")]
    pub generated: DateTime<Utc>,

    pub tables: TableMap,
}

impl SchemaDocument {
    /// Build a document from tables, keeping their order.
    pub fn from_tables(tables: impl IntoIterator<Item = Table>, generated: DateTime<Utc>) -> Self {
        let mut map = TableMap::default();
        for table in tables {
            map.insert(table);
        }
        Self {
            version: DOCUMENT_VERSION.to_string(),
            generated: generated.trunc_subsecs(0),
            tables: map,
        }
    }

    /// Rebuild one table of the Schema Model.
    pub fn table(&self, name: &str) -> Option<Table> {
        self.tables.get(name).map(|doc| doc.to_table(name))
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.names().collect()
    }

    /// Rebuild every table, in document order.
    pub fn into_tables(self) -> Vec<Table> {
        self.tables
            .entries
            .into_iter()
            .map(|(name, doc)| doc.into_table(name))
            .collect()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// One table's body inside the document; the name is the map key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDocument {
    pub columns: Vec<Column>,

    #[serde(default)]
    pub indexes: Vec<Index>,

    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableDocument {
    fn to_table(&self, name: &str) -> Table {
        self.clone().into_table(name.to_string())
    }

    fn into_table(self, name: String) -> Table {
        Table {
            name,
            columns: self.columns,
            indexes: self.indexes,
            foreign_keys: self.foreign_keys,
        }
    }
}

impl From<Table> for TableDocument {
    fn from(table: Table) -> Self {
        Self {
            columns: table.columns,
            indexes: table.indexes,
            foreign_keys: table.foreign_keys,
        }
    }
}

/// Table name to body, in insertion order.
///
/// Serialized as a JSON object; duplicate keys are rejected on load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableMap {
    entries: Vec<(String, TableDocument)>,
}

impl TableMap {
    /// Insert a table, replacing a previous entry of the same name in place.
    pub fn insert(&mut self, table: Table) {
        let name = table.name.clone();
        let doc = TableDocument::from(table);
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = doc,
            None => self.entries.push((name, doc)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TableDocument> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableDocument)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for TableMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, doc) in &self.entries {
            map.serialize_entry(name, doc)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TableMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableMapVisitor;

        impl<'de> Visitor<'de> for TableMapVisitor {
            type Value = TableMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of table name to table definition")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<TableMap, A::Error> {
                let mut seen = HashSet::new();
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, doc)) = access.next_entry::<String, TableDocument>()? {
                    if !seen.insert(name.clone()) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate table '{}'",
                            name
                        )));
                    }
                    entries.push((name, doc));
                }
                Ok(TableMap { entries })
            }
        }

        deserializer.deserialize_map(TableMapVisitor)
    }
}

mod rfc3339_seconds {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Exports tables from a [`SchemaReader`] as a [`SchemaDocument`] or JSON.
pub struct StructuredExporter<'a> {
    reader: &'a dyn SchemaReader,
    generated_at: Option<DateTime<Utc>>,
}

impl<'a> StructuredExporter<'a> {
    pub fn new(reader: &'a dyn SchemaReader) -> Self {
        Self {
            reader,
            generated_at: None,
        }
    }

    /// Pin the `generated` timestamp instead of reading the clock.
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn to_record(&self, request: &ExportRequest) -> Result<SchemaDocument> {
        let tables = fetch_tables(self.reader, request)?;
        let generated = self.generated_at.unwrap_or_else(Utc::now);
        let doc = SchemaDocument::from_tables(tables, generated);
        info!(
            "Exported {} tables from {} as a structured record",
            doc.tables.len(),
            self.reader.engine()
        );
        Ok(doc)
    }

    pub fn to_json(&self, request: &ExportRequest, pretty: bool) -> Result<String> {
        self.to_record(request)?.to_json(pretty)
    }
}
