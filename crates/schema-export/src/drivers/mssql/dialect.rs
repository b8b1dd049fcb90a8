//! MSSQL SQL dialect (Strategy pattern).
//!
//! Provides MSSQL-specific DDL syntax for identifier quoting, column types,
//! identity columns, and guarded constraint drops.

use crate::core::identifier::{quote_mssql, string_literal};
use crate::core::schema::{Column, ForeignKey, Index, LogicalType, ReferentialAction};
use crate::core::traits::Dialect;
use crate::drivers::common::{enum_check, enum_width};
use crate::error::{ExportError, Result};

/// Largest fractional-second precision SQL Server accepts.
const MAX_FSP: u32 = 7;

/// Longest NVARCHAR/NCHAR length before `MAX` is required.
const MAX_NVARCHAR: u32 = 4000;

/// Longest VARBINARY length before `MAX` is required.
const MAX_VARBINARY: u32 = 8000;

/// Microsoft SQL Server dialect implementation.
///
/// Targets SQL Server 2016+ (`DROP ... IF EXISTS`).
#[derive(Debug, Clone, Default)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// Create a new MSSQL dialect instance.
    pub fn new() -> Self {
        Self
    }

    fn temporal(base: &str, col: &Column) -> String {
        match col.precision {
            Some(p) => format!("{}({})", base, p.min(MAX_FSP)),
            None => base.to_string(),
        }
    }

    fn nvarchar(len: u32) -> String {
        if len > MAX_NVARCHAR {
            "NVARCHAR(MAX)".to_string()
        } else {
            format!("NVARCHAR({})", len)
        }
    }
}

impl Dialect for MssqlDialect {
    fn name(&self) -> &str {
        "mssql"
    }

    fn quote_ident(&self, name: &str) -> String {
        quote_mssql(name)
    }

    fn render_column_type(&self, col: &Column) -> Result<String> {
        let ty = match &col.logical_type {
            LogicalType::String => Self::nvarchar(col.length.unwrap_or(255)),
            LogicalType::Char => format!("NCHAR({})", col.length.unwrap_or(1).min(MAX_NVARCHAR)),
            LogicalType::Text | LogicalType::Json => "NVARCHAR(MAX)".to_string(),
            LogicalType::TinyInteger => "TINYINT".to_string(),
            LogicalType::SmallInteger => "SMALLINT".to_string(),
            LogicalType::Integer => "INT".to_string(),
            LogicalType::BigInteger => "BIGINT".to_string(),
            LogicalType::Decimal => match (col.precision, col.scale) {
                (Some(p), s) => format!("DECIMAL({},{})", p, s.unwrap_or(0)),
                (None, _) => "DECIMAL".to_string(),
            },
            LogicalType::Float => "REAL".to_string(),
            LogicalType::Double => "FLOAT".to_string(),
            LogicalType::Boolean => "BIT".to_string(),
            LogicalType::Date => "DATE".to_string(),
            LogicalType::Time => Self::temporal("TIME", col),
            LogicalType::DateTime => Self::temporal("DATETIME2", col),
            LogicalType::Timestamp => Self::temporal("DATETIMEOFFSET", col),
            LogicalType::Binary => match col.length {
                Some(len) if len <= MAX_VARBINARY => format!("VARBINARY({})", len),
                _ => "VARBINARY(MAX)".to_string(),
            },
            LogicalType::Uuid => "UNIQUEIDENTIFIER".to_string(),
            LogicalType::Enum => Self::nvarchar(enum_width(self.name(), col)?),
            LogicalType::Interval | LogicalType::Inet | LogicalType::Unknown(_) => {
                return Err(ExportError::dialect(
                    self.name(),
                    format!(
                        "no column type for logical type '{}' (column '{}')",
                        col.logical_type, col.name
                    ),
                ));
            }
        };
        Ok(ty)
    }

    fn render_auto_increment(&self, col: &Column) -> Option<String> {
        col.auto_increment.then(|| "IDENTITY(1,1)".to_string())
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

    /// T-SQL has no `RESTRICT`; `NO ACTION` is the equivalent check.
    fn render_referential_action(&self, action: ReferentialAction) -> &'static str {
        match action {
            ReferentialAction::Restrict => ReferentialAction::NoAction.as_sql(),
            other => other.as_sql(),
        }
    }

    fn begin_transaction(&self) -> String {
        "BEGIN TRANSACTION".to_string()
    }

    fn commit_transaction(&self) -> String {
        "COMMIT TRANSACTION".to_string()
    }

    fn render_boolean(&self, value: bool) -> String {
        let literal = if value { "1" } else { "0" };
        literal.to_string()
    }

    /// Unicode string literal (`N'...'`).
    fn render_string(&self, value: &str) -> String {
        format!("N{}", string_literal(value))
    }

    fn render_expression(&self, expression: &str) -> String {
        format!("({})", expression)
    }

    /// SQL Server refuses to drop a table still referenced by a constraint,
    /// even inside the same batch, so cycle-closing keys go first.
    fn render_drop_foreign_key(&self, table: &str, fk: &ForeignKey) -> Option<String> {
        let quoted = self.quote_ident(table);
        Some(format!(
            "IF OBJECT_ID({}, N'U') IS NOT NULL ALTER TABLE {} DROP CONSTRAINT IF EXISTS {}",
            self.render_string(&quoted),
            quoted,
            self.quote_ident(&fk.constraint_name(table))
        ))
    }
}
