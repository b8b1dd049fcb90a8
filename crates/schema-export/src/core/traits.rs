//! Core traits for schema export.
//!
//! This module defines the two capabilities the export pipeline is built on:
//!
//! - [`SchemaReader`]: supplies normalized table metadata (consumed)
//! - [`Dialect`]: renders DDL fragments for one database engine
//!
//! # Design Patterns
//!
//! - **Strategy**: each engine provides its own `Dialect`
//! - **Template Method**: provided methods on `Dialect` assemble statements
//!   from the engine-specific primitives (`quote_ident`, literal rendering)

use crate::error::{ReaderResult, Result};

use super::identifier::{string_literal, MAX_IDENTIFIER_LENGTH};
use super::schema::{Column, DefaultValue, ForeignKey, Index, ReferentialAction, TableEntry};

/// Supplies schema metadata for one database.
///
/// Implementations run the introspection queries; the export pipeline only
/// consumes the normalized records. A `None` result means "not available"
/// for `tables`/`columns` and "none" for `indexes`/`foreign_keys`.
pub trait SchemaReader {
    /// Identifier of the engine the metadata was read from (e.g. "postgres").
    ///
    /// The exporter selects its dialect from this value.
    fn engine(&self) -> &str;

    /// List the relations the reader knows about.
    fn tables(&self) -> ReaderResult<Option<Vec<TableEntry>>>;

    /// Columns of `table` in ordinal order.
    ///
    /// When `fields` is given, returns exactly those columns in the given
    /// order, or `None` if any named field does not exist on the table.
    fn columns(&self, table: &str, fields: Option<&[String]>) -> ReaderResult<Option<Vec<Column>>>;

    /// Indexes of `table` (primary key excluded).
    fn indexes(&self, table: &str) -> ReaderResult<Option<Vec<super::schema::Index>>>;

    /// Foreign keys declared on `table`.
    fn foreign_keys(&self, table: &str) -> ReaderResult<Option<Vec<ForeignKey>>>;

    /// Map a raw driver type name to a logical type name.
    fn field_type(&self, raw_type: &str) -> Option<String> {
        crate::typemap::logical_type(self.engine(), raw_type).map(|t| t.to_string())
    }
}

/// DDL syntax strategy for one database engine.
///
/// Dialects must be stateless after construction: a single instance is
/// shared across threads through the [`DialectCatalog`](super::DialectCatalog).
pub trait Dialect: Send + Sync {
    /// Get the dialect identifier (e.g., "mysql", "postgres").
    fn name(&self) -> &str;

    /// Quote an identifier (table name, column name, etc.).
    ///
    /// - MySQL: `` `identifier` ``
    /// - PostgreSQL: `"identifier"`
    /// - SQL Server: `[identifier]`
    fn quote_ident(&self, name: &str) -> String;

    /// Render the type of a column, including length/precision/scale where
    /// the type accepts them.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Dialect` when the logical type has no rendering
    /// rule for this engine.
    fn render_column_type(&self, col: &Column) -> Result<String>;

    /// Render the auto-increment clause (`AUTO_INCREMENT`, `IDENTITY(1,1)`, ...).
    fn render_auto_increment(&self, col: &Column) -> Option<String>;

    /// Render the enum constraint clause for engines without a native enum type.
    fn render_enum_clause(&self, col: &Column) -> Option<String>;

    /// Render an index inside `CREATE TABLE`, or `None` if this engine
    /// creates it with a separate statement.
    fn render_inline_index(&self, table: &str, idx: &Index) -> Option<String>;

    /// Longest identifier, in bytes, the engine stores without truncating.
    fn max_identifier_length(&self) -> usize {
        MAX_IDENTIFIER_LENGTH
    }

    /// Statement separator.
    fn statement_terminator(&self) -> &str {
        ";"
    }

    fn begin_transaction(&self) -> String {
        "BEGIN".to_string()
    }

    fn commit_transaction(&self) -> String {
        "COMMIT".to_string()
    }

    /// Render a boolean literal.
    fn render_boolean(&self, value: bool) -> String {
        let literal = if value { "TRUE" } else { "FALSE" };
        literal.to_string()
    }

    /// Render a string literal.
    fn render_string(&self, value: &str) -> String {
        string_literal(value)
    }

    /// Render a raw default expression.
    fn render_expression(&self, expression: &str) -> String {
        expression.to_string()
    }

    /// Render the default value of a column.
    ///
    /// Returns `None` when the column has no default and `Some("NULL")` for
    /// an explicit NULL default.
    fn render_default(&self, col: &Column) -> Option<String> {
        col.default.as_ref().map(|default| match default {
            DefaultValue::Null => "NULL".to_string(),
            DefaultValue::Boolean(b) => self.render_boolean(*b),
            DefaultValue::Number(n) => n.trim().to_string(),
            DefaultValue::String(s) => self.render_string(s),
            DefaultValue::CurrentTimestamp => "CURRENT_TIMESTAMP".to_string(),
            DefaultValue::Expression(e) => self.render_expression(e),
        })
    }

    /// Render a standalone `CREATE INDEX` statement.
    fn render_create_index(&self, table: &str, idx: &Index) -> String {
        let unique = if idx.unique { "UNIQUE " } else { "" };
        format!(
            "CREATE {}INDEX {} ON {} ({})",
            unique,
            self.quote_ident(&idx.name),
            self.quote_ident(table),
            self.quote_list(&idx.columns)
        )
    }

    /// Render an `ON DELETE` / `ON UPDATE` action.
    fn render_referential_action(&self, action: ReferentialAction) -> &'static str {
        action.as_sql()
    }

    /// Render a foreign key constraint clause.
    fn render_foreign_key(&self, table: &str, fk: &ForeignKey) -> String {
        let mut sql = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote_ident(&fk.constraint_name(table)),
            self.quote_list(&fk.columns),
            self.quote_ident(&fk.referenced_table),
            self.quote_list(&fk.referenced_columns)
        );
        if let Some(action) = fk.on_delete {
            sql.push_str(&format!(" ON DELETE {}", self.render_referential_action(action)));
        }
        if let Some(action) = fk.on_update {
            sql.push_str(&format!(" ON UPDATE {}", self.render_referential_action(action)));
        }
        sql
    }

    /// Render `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY` for a deferred key.
    fn render_add_foreign_key(&self, table: &str, fk: &ForeignKey) -> String {
        format!(
            "ALTER TABLE {} ADD {}",
            self.quote_ident(table),
            self.render_foreign_key(table, fk)
        )
    }

    /// Render a statement dropping a deferred foreign key before its tables
    /// are dropped, for engines that refuse to drop a referenced table.
    fn render_drop_foreign_key(&self, _table: &str, _fk: &ForeignKey) -> Option<String> {
        None
    }

    /// Render `DROP TABLE IF EXISTS`.
    fn render_drop_table(&self, table: &str) -> String {
        format!("DROP TABLE IF EXISTS {}", self.quote_ident(table))
    }

    /// Statements emitted before the DROP block.
    fn drop_preamble(&self) -> Vec<String> {
        Vec::new()
    }

    /// Statements emitted after the DROP block.
    fn drop_postamble(&self) -> Vec<String> {
        Vec::new()
    }

    /// Quote and comma-join a list of identifiers.
    fn quote_list(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|n| self.quote_ident(n))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{LogicalType, ReferentialAction};

    struct AnsiDialect;

    impl Dialect for AnsiDialect {
        fn name(&self) -> &str {
            "ansi"
        }

        fn quote_ident(&self, name: &str) -> String {
            crate::core::identifier::quote_pg(name)
        }

        fn render_column_type(&self, col: &Column) -> Result<String> {
            Ok(col.logical_type.to_string())
        }

        fn render_auto_increment(&self, _col: &Column) -> Option<String> {
            None
        }

        fn render_enum_clause(&self, _col: &Column) -> Option<String> {
            None
        }

        fn render_inline_index(&self, _table: &str, _idx: &Index) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_render_default_distinguishes_null_from_none() {
        let d = AnsiDialect;
        let col = Column::new("note", LogicalType::Text);
        assert_eq!(d.render_default(&col), None);

        let col = col.with_default(DefaultValue::Null);
        assert_eq!(d.render_default(&col).as_deref(), Some("NULL"));
    }

    #[test]
    fn test_render_default_literals() {
        let d = AnsiDialect;
        let col = Column::new("name", LogicalType::String)
            .with_default(DefaultValue::String("it's".into()));
        assert_eq!(d.render_default(&col).as_deref(), Some("'it''s'"));

        let col = Column::new("active", LogicalType::Boolean)
            .with_default(DefaultValue::Boolean(true));
        assert_eq!(d.render_default(&col).as_deref(), Some("TRUE"));

        let col = Column::new("created_at", LogicalType::Timestamp)
            .with_default(DefaultValue::CurrentTimestamp);
        assert_eq!(d.render_default(&col).as_deref(), Some("CURRENT_TIMESTAMP"));
    }

    #[test]
    fn test_render_create_index() {
        let d = AnsiDialect;
        let idx = Index::new("ix_orders_user", ["user_id", "created_at"], false);
        assert_eq!(
            d.render_create_index("orders", &idx),
            "CREATE INDEX \"ix_orders_user\" ON \"orders\" (\"user_id\", \"created_at\")"
        );
        let idx = Index::new("uq_orders_ref", ["ref"], true);
        assert!(d.render_create_index("orders", &idx).starts_with("CREATE UNIQUE INDEX"));
    }

    #[test]
    fn test_render_add_foreign_key() {
        let d = AnsiDialect;
        let fk = ForeignKey::new(["user_id"], "users", ["id"])
            .on_delete(ReferentialAction::Cascade)
            .on_update(ReferentialAction::NoAction);
        assert_eq!(
            d.render_add_foreign_key("orders", &fk),
            "ALTER TABLE \"orders\" ADD CONSTRAINT \"fk_orders_user_id\" FOREIGN KEY (\"user_id\") \
             REFERENCES \"users\" (\"id\") ON DELETE CASCADE ON UPDATE NO ACTION"
        );
    }
}
