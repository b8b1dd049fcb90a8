//! PostgreSQL SQL dialect (Strategy pattern).
//!
//! Provides PostgreSQL-specific DDL syntax for identifier quoting, column
//! types, identity columns, and cascading drops.

use crate::core::identifier::quote_pg;
use crate::core::schema::{Column, Index, LogicalType};
use crate::core::traits::Dialect;
use crate::drivers::common::{enum_check, enum_width};
use crate::error::{ExportError, Result};

/// Largest fractional-second precision PostgreSQL accepts.
const MAX_FSP: u32 = 6;

/// `NAMEDATALEN - 1`; longer names are silently truncated.
const MAX_IDENTIFIER: usize = 63;

/// PostgreSQL dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Create a new PostgreSQL dialect instance.
    pub fn new() -> Self {
        Self
    }

    fn temporal(base: &str, col: &Column) -> String {
        match col.precision {
            Some(p) => format!("{}({})", base, p.min(MAX_FSP)),
            None => base.to_string(),
        }
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &str {
        "postgres"
    }

    fn quote_ident(&self, name: &str) -> String {
        quote_pg(name)
    }

    fn render_column_type(&self, col: &Column) -> Result<String> {
        let ty = match &col.logical_type {
            LogicalType::String => match col.length {
                Some(len) => format!("VARCHAR({})", len),
                None => "VARCHAR".to_string(),
            },
            LogicalType::Char => format!("CHAR({})", col.length.unwrap_or(1)),
            LogicalType::Text => "TEXT".to_string(),
            // no single-byte integer; widen
            LogicalType::TinyInteger | LogicalType::SmallInteger => "SMALLINT".to_string(),
            LogicalType::Integer => "INTEGER".to_string(),
            LogicalType::BigInteger => "BIGINT".to_string(),
            LogicalType::Decimal => match (col.precision, col.scale) {
                (Some(p), s) => format!("NUMERIC({},{})", p, s.unwrap_or(0)),
                (None, _) => "NUMERIC".to_string(),
            },
            LogicalType::Float => "REAL".to_string(),
            LogicalType::Double => "DOUBLE PRECISION".to_string(),
            LogicalType::Boolean => "BOOLEAN".to_string(),
            LogicalType::Date => "DATE".to_string(),
            LogicalType::Time => Self::temporal("TIME", col),
            LogicalType::DateTime => Self::temporal("TIMESTAMP", col),
            LogicalType::Timestamp => Self::temporal("TIMESTAMPTZ", col),
            LogicalType::Binary => "BYTEA".to_string(),
            LogicalType::Uuid => "UUID".to_string(),
            LogicalType::Json => "JSON".to_string(),
            LogicalType::Enum => format!("VARCHAR({})", enum_width(self.name(), col)?),
            LogicalType::Interval => "INTERVAL".to_string(),
            LogicalType::Inet => "INET".to_string(),
            LogicalType::Unknown(name) => {
                return Err(ExportError::dialect(
                    self.name(),
                    format!("no column type for logical type '{}' (column '{}')", name, col.name),
                ));
            }
        };
        Ok(ty)
    }

    fn render_auto_increment(&self, col: &Column) -> Option<String> {
        col.auto_increment
            .then(|| "GENERATED BY DEFAULT AS IDENTITY".to_string())
    }

    fn render_enum_clause(&self, col: &Column) -> Option<String> {
        enum_check(self, col)
    }

    fn render_inline_index(&self, _table: &str, idx: &Index) -> Option<String> {
        idx.unique.then(|| {
            format!(
                "CONSTRAINT {} UNIQUE ({})",
                self.quote_ident(&idx.name),
                self.quote_list(&idx.columns)
            )
        })
    }

    fn max_identifier_length(&self) -> usize {
        MAX_IDENTIFIER
    }

    fn render_drop_table(&self, table: &str) -> String {
        format!("DROP TABLE IF EXISTS {} CASCADE", self.quote_ident(table))
    }
}
