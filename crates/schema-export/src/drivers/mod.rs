//! Database driver implementations.
//!
//! This module provides database-specific implementations of the core traits:
//!
//! - [`mysql`]: MySQL/MariaDB driver
//! - [`postgres`]: PostgreSQL driver
//! - [`mssql`]: Microsoft SQL Server driver
//!
//! # Architecture
//!
//! Each driver module implements:
//! - `Dialect`: DDL syntax strategy for the database engine
//! - `logical_type`: raw type name → logical type table
//!
//! # Adding New Databases
//!
//! To add support for a new database:
//!
//! 1. Create a new module under `drivers/` (e.g., `drivers/sqlite/`)
//! 2. Implement the `Dialect` trait and a `logical_type` table
//! 3. Add an enum variant to `DialectImpl` and its aliases to `normalize_engine`
//!
//! Dialects that live outside this crate can skip all of that and be
//! registered on a [`DialectCatalog`](crate::core::DialectCatalog) instead.

mod common;
pub mod mssql;
pub mod mysql;
pub mod postgres;

// Re-export driver types
pub use mssql::MssqlDialect;
pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;

use crate::core::schema::{Column, ForeignKey, Index, ReferentialAction};
use crate::core::traits::Dialect;
use crate::error::{ExportError, Result};

/// Canonical ids of the built-in engines.
pub const SUPPORTED_ENGINES: &[&str] = &["mysql", "postgres", "mssql"];

/// Get the canonical engine id for an engine name or alias.
///
/// - "mysql", "mariadb" → "mysql"
/// - "postgres", "postgresql", "pg" → "postgres"
/// - "mssql", "sqlserver", "sql_server" → "mssql"
pub fn normalize_engine(engine: &str) -> Option<&'static str> {
    match engine.trim().to_lowercase().as_str() {
        "mysql" | "mariadb" => Some("mysql"),
        "postgres" | "postgresql" | "pg" => Some("postgres"),
        "mssql" | "sqlserver" | "sql_server" => Some("mssql"),
        _ => None,
    }
}

/// Enum-based static dispatch for the built-in dialects.
///
/// Note: We use a manual impl instead of the enum_dispatch macro so that
/// provided trait methods are forwarded too; a missed override would
/// silently fall back to the generic default.
#[derive(Debug, Clone)]
pub enum DialectImpl {
    Mysql(MysqlDialect),
    Postgres(PostgresDialect),
    Mssql(MssqlDialect),
}

macro_rules! dispatch {
    ($self:ident, $d:ident => $body:expr) => {
        match $self {
            DialectImpl::Mysql($d) => $body,
            DialectImpl::Postgres($d) => $body,
            DialectImpl::Mssql($d) => $body,
        }
    };
}

impl Dialect for DialectImpl {
    fn name(&self) -> &str {
        dispatch!(self, d => d.name())
    }

    fn quote_ident(&self, name: &str) -> String {
        dispatch!(self, d => d.quote_ident(name))
    }

    fn render_column_type(&self, col: &Column) -> Result<String> {
        dispatch!(self, d => d.render_column_type(col))
    }

    fn render_auto_increment(&self, col: &Column) -> Option<String> {
        dispatch!(self, d => d.render_auto_increment(col))
    }

    fn render_enum_clause(&self, col: &Column) -> Option<String> {
        dispatch!(self, d => d.render_enum_clause(col))
    }

    fn render_inline_index(&self, table: &str, idx: &Index) -> Option<String> {
        dispatch!(self, d => d.render_inline_index(table, idx))
    }

    fn max_identifier_length(&self) -> usize {
        dispatch!(self, d => d.max_identifier_length())
    }

    fn statement_terminator(&self) -> &str {
        dispatch!(self, d => d.statement_terminator())
    }

    fn begin_transaction(&self) -> String {
        dispatch!(self, d => d.begin_transaction())
    }

    fn commit_transaction(&self) -> String {
        dispatch!(self, d => d.commit_transaction())
    }

    fn render_boolean(&self, value: bool) -> String {
        dispatch!(self, d => d.render_boolean(value))
    }

    fn render_string(&self, value: &str) -> String {
        dispatch!(self, d => d.render_string(value))
    }

    fn render_expression(&self, expression: &str) -> String {
        dispatch!(self, d => d.render_expression(expression))
    }

    fn render_default(&self, col: &Column) -> Option<String> {
        dispatch!(self, d => d.render_default(col))
    }

    fn render_create_index(&self, table: &str, idx: &Index) -> String {
        dispatch!(self, d => d.render_create_index(table, idx))
    }

    fn render_referential_action(&self, action: ReferentialAction) -> &'static str {
        dispatch!(self, d => d.render_referential_action(action))
    }

    fn render_foreign_key(&self, table: &str, fk: &ForeignKey) -> String {
        dispatch!(self, d => d.render_foreign_key(table, fk))
    }

    fn render_add_foreign_key(&self, table: &str, fk: &ForeignKey) -> String {
        dispatch!(self, d => d.render_add_foreign_key(table, fk))
    }

    fn render_drop_foreign_key(&self, table: &str, fk: &ForeignKey) -> Option<String> {
        dispatch!(self, d => d.render_drop_foreign_key(table, fk))
    }

    fn render_drop_table(&self, table: &str) -> String {
        dispatch!(self, d => d.render_drop_table(table))
    }

    fn drop_preamble(&self) -> Vec<String> {
        dispatch!(self, d => d.drop_preamble())
    }

    fn drop_postamble(&self) -> Vec<String> {
        dispatch!(self, d => d.drop_postamble())
    }
}

impl DialectImpl {
    /// Create a dialect implementation from a database type string.
    ///
    /// # Errors
    ///
    /// Returns an error if the database type is not recognized.
    pub fn from_db_type(db_type: &str) -> Result<Self> {
        match normalize_engine(db_type) {
            Some("mysql") => Ok(DialectImpl::Mysql(MysqlDialect::new())),
            Some("postgres") => Ok(DialectImpl::Postgres(PostgresDialect::new())),
            Some("mssql") => Ok(DialectImpl::Mssql(MssqlDialect::new())),
            _ => Err(ExportError::dialect(
                db_type,
                format!(
                    "Unknown database type: '{}'. Supported types: {}",
                    db_type,
                    SUPPORTED_ENGINES.join(", ")
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::LogicalType;

    #[test]
    fn test_normalize_engine() {
        assert_eq!(normalize_engine("MariaDB"), Some("mysql"));
        assert_eq!(normalize_engine("postgresql"), Some("postgres"));
        assert_eq!(normalize_engine("pg"), Some("postgres"));
        assert_eq!(normalize_engine("sql_server"), Some("mssql"));
        assert_eq!(normalize_engine("sqlite"), None);
    }

    #[test]
    fn test_dialect_impl_from_db_type() {
        let mssql = DialectImpl::from_db_type("mssql").unwrap();
        assert_eq!(mssql.name(), "mssql");

        let postgres = DialectImpl::from_db_type("postgres").unwrap();
        assert_eq!(postgres.name(), "postgres");

        // Alternative names
        assert!(DialectImpl::from_db_type("sqlserver").is_ok());
        assert!(DialectImpl::from_db_type("postgresql").is_ok());
        assert_eq!(DialectImpl::from_db_type("mariadb").unwrap().name(), "mysql");

        // Unknown should error
        assert!(DialectImpl::from_db_type("unknown").is_err());
    }

    #[test]
    fn test_dialect_impl_forwards_overrides() {
        let mysql = DialectImpl::from_db_type("mysql").unwrap();
        assert_eq!(mysql.begin_transaction(), "START TRANSACTION");
        assert_eq!(mysql.quote_ident("table"), "`table`");

        let mssql = DialectImpl::from_db_type("mssql").unwrap();
        assert_eq!(mssql.render_string("x"), "N'x'");
        let col = Column::new("flag", LogicalType::Boolean)
            .with_default(crate::core::schema::DefaultValue::Boolean(true));
        assert_eq!(mssql.render_default(&col).as_deref(), Some("1"));

        assert_eq!(mssql.render_referential_action(ReferentialAction::Restrict), "NO ACTION");
        assert_eq!(mssql.max_identifier_length(), 128);

        let pg = DialectImpl::from_db_type("pg").unwrap();
        assert!(pg.render_drop_table("t").ends_with("CASCADE"));
        assert_eq!(pg.max_identifier_length(), 63);
        assert_eq!(mysql.max_identifier_length(), 64);
    }
}
