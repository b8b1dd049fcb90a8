//! Export pipeline: fetch tables from a reader, then render them.
//!
//! - [`ddl`]: SQL DDL script for one dialect
//! - [`document`]: JSON / structured record
//!
//! Both exporters share [`fetch_tables`], which turns an [`ExportRequest`]
//! into validated Schema Model tables. Nothing is rendered until every
//! requested table has been fetched and validated.

pub mod ddl;
pub mod document;

pub use ddl::{DdlExporter, DdlScript, ExportOptions, Statement, StatementKind};
pub use document::{SchemaDocument, StructuredExporter, TableDocument, TableMap};

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::core::schema::{Table, TableKind};
use crate::core::traits::SchemaReader;
use crate::error::{ExportError, Result};

/// One requested table, with an optional column projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRequest {
    pub name: String,

    /// Columns to export, in output order. `None` exports every column.
    pub fields: Option<Vec<String>>,
}

impl TableRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: None,
        }
    }
}

/// Tables to export, in caller order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRequest {
    pub tables: Vec<TableRequest>,
}

impl ExportRequest {
    /// Request whole tables by name.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tables: names.into_iter().map(TableRequest::new).collect(),
        }
    }

    /// Request every base table the reader lists, in listing order.
    ///
    /// Views are skipped. A reader that lists nothing yields an empty request.
    pub fn all_tables(reader: &dyn SchemaReader) -> Result<Self> {
        let entries = reader.tables()?.unwrap_or_default();
        Ok(Self::new(
            entries
                .into_iter()
                .filter(|e| e.kind == TableKind::Table)
                .map(|e| e.name),
        ))
    }

    /// Add a whole table.
    pub fn with_table(mut self, name: impl Into<String>) -> Self {
        self.tables.push(TableRequest::new(name));
        self
    }

    /// Add a table restricted to `fields`.
    pub fn with_fields<I, S>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.push(TableRequest {
            name: name.into(),
            fields: Some(fields.into_iter().map(Into::into).collect()),
        });
        self
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}

/// Fetch and validate every requested table, in request order.
///
/// # Errors
///
/// - `InvalidSchema` for a table requested twice, a projection naming a
///   missing field, or a table that fails [`Table::validate`]
/// - `UnknownTable` for a name the reader does not list as a base table
/// - `Reader` for any failure reported by the reader
pub fn fetch_tables(reader: &dyn SchemaReader, request: &ExportRequest) -> Result<Vec<Table>> {
    let mut requested = HashSet::with_capacity(request.len());
    for table in &request.tables {
        if !requested.insert(table.name.as_str()) {
            return Err(ExportError::InvalidSchema(format!(
                "Duplicate table '{}' in export request",
                table.name
            )));
        }
    }

    if request.is_empty() {
        return Ok(Vec::new());
    }

    let known: HashSet<String> = reader
        .tables()?
        .unwrap_or_default()
        .into_iter()
        .filter(|e| e.kind == TableKind::Table)
        .map(|e| e.name)
        .collect();

    let mut tables = Vec::with_capacity(request.len());
    for req in &request.tables {
        if !known.contains(&req.name) {
            return Err(ExportError::unknown_table(&req.name));
        }

        let columns = match reader.columns(&req.name, req.fields.as_deref())? {
            Some(columns) => columns,
            None if req.fields.is_some() => {
                return Err(ExportError::InvalidSchema(format!(
                    "Projection for table '{}' names a field the table does not have: {:?}",
                    req.name,
                    req.fields.as_deref().unwrap_or_default()
                )));
            }
            None => return Err(ExportError::unknown_table(&req.name)),
        };

        let mut table = Table {
            name: req.name.clone(),
            columns,
            indexes: reader.indexes(&req.name)?.unwrap_or_default(),
            foreign_keys: reader.foreign_keys(&req.name)?.unwrap_or_default(),
        };

        if req.fields.is_some() {
            for removed in table.retain_covered_constraints() {
                warn!(
                    "Dropped '{}' from table '{}': it uses columns outside the projection",
                    removed, table.name
                );
            }
        }

        table.validate()?;
        debug!(
            "Fetched table '{}' ({} columns, {} indexes, {} foreign keys)",
            table.name,
            table.columns.len(),
            table.indexes.len(),
            table.foreign_keys.len()
        );
        tables.push(table);
    }

    Ok(tables)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared schemas for exporter tests.

    use crate::core::schema::{
        Column, DefaultValue, ForeignKey, Index, LogicalType, ReferentialAction, Table,
    };
    use crate::reader::MemoryReader;

    pub fn users() -> Table {
        Table::new("users")
            .with_column(
                Column::new("id", LogicalType::Integer)
                    .primary_key()
                    .auto_increment(),
            )
            .with_column(Column::new("email", LogicalType::String).with_length(255).not_null())
            .with_column(Column::enumeration("status", ["active", "banned"]).not_null())
            .with_column(
                Column::new("created_at", LogicalType::Timestamp)
                    .not_null()
                    .with_default(DefaultValue::CurrentTimestamp),
            )
            .with_index(Index::new("uq_users_email", ["email"], true))
            .with_index(Index::new("ix_users_created", ["created_at"], false))
    }

    pub fn orders() -> Table {
        Table::new("orders")
            .with_column(
                Column::new("id", LogicalType::BigInteger)
                    .primary_key()
                    .auto_increment(),
            )
            .with_column(Column::new("user_id", LogicalType::Integer).not_null())
            .with_column(Column::new("total", LogicalType::Decimal).with_precision(10, 2))
            .with_column(Column::new("note", LogicalType::Text).with_default(DefaultValue::Null))
            .with_foreign_key(
                ForeignKey::new(["user_id"], "users", ["id"]).on_delete(ReferentialAction::Cascade),
            )
    }

    pub fn order_items() -> Table {
        Table::new("order_items")
            .with_column(Column::new("order_id", LogicalType::BigInteger).primary_key())
            .with_column(Column::new("line", LogicalType::SmallInteger).primary_key())
            .with_column(
                Column::new("quantity", LogicalType::Integer)
                    .not_null()
                    .with_default(DefaultValue::Number("1".into())),
            )
            .with_foreign_key(ForeignKey::new(["order_id"], "orders", ["id"]))
    }

    pub fn shop(engine: &str) -> MemoryReader {
        MemoryReader::from_tables(engine, vec![users(), orders(), order_items()])
    }

    /// `a` and `b` reference each other.
    pub fn cycle(engine: &str) -> MemoryReader {
        let a = Table::new("a")
            .with_column(Column::new("id", LogicalType::Integer).primary_key())
            .with_column(Column::new("b_id", LogicalType::Integer))
            .with_foreign_key(ForeignKey::new(["b_id"], "b", ["id"]));
        let b = Table::new("b")
            .with_column(Column::new("id", LogicalType::Integer).primary_key())
            .with_column(Column::new("a_id", LogicalType::Integer))
            .with_foreign_key(ForeignKey::new(["a_id"], "a", ["id"]));
        MemoryReader::from_tables(engine, vec![a, b])
    }
}
