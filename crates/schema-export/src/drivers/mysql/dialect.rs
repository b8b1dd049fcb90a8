//! MySQL/MariaDB SQL dialect (Strategy pattern).
//!
//! Provides MySQL-specific DDL syntax for identifier quoting, column types,
//! inline keys, and foreign key check toggling around drops.

use crate::core::identifier::quote_mysql;
use crate::core::schema::{Column, Index, LogicalType};
use crate::core::traits::Dialect;
use crate::error::{ExportError, Result};

/// Largest fractional-second precision MySQL accepts.
const MAX_FSP: u32 = 6;

/// MySQL identifier limit.
const MAX_IDENTIFIER: usize = 64;

/// MySQL/MariaDB dialect implementation.
///
/// Compatible with MySQL 8.0.13+ (expression defaults) and MariaDB 10.2+.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
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

impl Dialect for MysqlDialect {
    fn name(&self) -> &str {
        "mysql"
    }

    fn quote_ident(&self, name: &str) -> String {
        quote_mysql(name)
    }

    fn render_column_type(&self, col: &Column) -> Result<String> {
        let ty = match &col.logical_type {
            LogicalType::String => format!("VARCHAR({})", col.length.unwrap_or(255)),
            LogicalType::Char => format!("CHAR({})", col.length.unwrap_or(1)),
            LogicalType::Text => "LONGTEXT".to_string(),
            LogicalType::TinyInteger => "TINYINT".to_string(),
            LogicalType::SmallInteger => "SMALLINT".to_string(),
            LogicalType::Integer => "INT".to_string(),
            LogicalType::BigInteger => "BIGINT".to_string(),
            LogicalType::Decimal => match (col.precision, col.scale) {
                (Some(p), s) => format!("DECIMAL({},{})", p, s.unwrap_or(0)),
                (None, _) => "DECIMAL".to_string(),
            },
            LogicalType::Float => "FLOAT".to_string(),
            LogicalType::Double => "DOUBLE".to_string(),
            // MySQL represents BOOLEAN as TINYINT(1)
            LogicalType::Boolean => "TINYINT(1)".to_string(),
            LogicalType::Date => "DATE".to_string(),
            LogicalType::Time => Self::temporal("TIME", col),
            LogicalType::DateTime => Self::temporal("DATETIME", col),
            LogicalType::Timestamp => Self::temporal("TIMESTAMP", col),
            LogicalType::Binary => match col.length {
                Some(len) => format!("VARBINARY({})", len),
                None => "LONGBLOB".to_string(),
            },
            LogicalType::Uuid => "CHAR(36)".to_string(),
            LogicalType::Json => "JSON".to_string(),
            LogicalType::Enum => {
                let values = col.enum_values.as_deref().unwrap_or_default();
                if values.is_empty() {
                    return Err(ExportError::dialect(
                        self.name(),
                        format!("enum column '{}' has no values", col.name),
                    ));
                }
                let list: Vec<String> = values.iter().map(|v| self.render_string(v)).collect();
                format!("ENUM({})", list.join(","))
            }
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
        col.auto_increment.then(|| "AUTO_INCREMENT".to_string())
    }

    /// Enums are a native column type; no extra clause.
    fn render_enum_clause(&self, _col: &Column) -> Option<String> {
        None
    }

    fn render_inline_index(&self, _table: &str, idx: &Index) -> Option<String> {
        let kind = if idx.unique { "UNIQUE KEY" } else { "KEY" };
        Some(format!(
            "{} {} ({})",
            kind,
            self.quote_ident(&idx.name),
            self.quote_list(&idx.columns)
        ))
    }

    fn max_identifier_length(&self) -> usize {
        MAX_IDENTIFIER
    }

    fn begin_transaction(&self) -> String {
        "START TRANSACTION".to_string()
    }

    fn render_boolean(&self, value: bool) -> String {
        let literal = if value { "1" } else { "0" };
        literal.to_string()
    }

    /// Backslash is an escape character under the default `sql_mode`, so it
    /// is doubled along with the quote.
    fn render_string(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('\'');
        for ch in value.chars() {
            match ch {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                _ => out.push(ch),
            }
        }
        out.push('\'');
        out
    }

    fn render_expression(&self, expression: &str) -> String {
        format!("({})", expression)
    }

    fn drop_preamble(&self) -> Vec<String> {
        vec!["SET FOREIGN_KEY_CHECKS = 0".to_string()]
    }

    fn drop_postamble(&self) -> Vec<String> {
        vec!["SET FOREIGN_KEY_CHECKS = 1".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{DefaultValue, ForeignKey};

    #[test]
    fn test_quote_ident() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.quote_ident("name"), "`name`");
        assert_eq!(dialect.quote_ident("table`name"), "`table``name`");
        assert_eq!(dialect.quote_ident("Users"), "`Users`");
    }

    #[test]
    fn test_column_types() {
        let dialect = MysqlDialect::new();
        let ty = |col: Column| dialect.render_column_type(&col).unwrap();

        assert_eq!(ty(Column::new("a", LogicalType::String).with_length(100)), "VARCHAR(100)");
        assert_eq!(ty(Column::new("a", LogicalType::String)), "VARCHAR(255)");
        assert_eq!(ty(Column::new("a", LogicalType::Boolean)), "TINYINT(1)");
        assert_eq!(ty(Column::new("a", LogicalType::Decimal).with_precision(10, 2)), "DECIMAL(10,2)");
        assert_eq!(ty(Column::new("a", LogicalType::Uuid)), "CHAR(36)");

        let mut ts = Column::new("a", LogicalType::DateTime);
        ts.precision = Some(9);
        assert_eq!(ty(ts), "DATETIME(6)");

        // length is ignored where the type takes none
        assert_eq!(ty(Column::new("a", LogicalType::Integer).with_length(11)), "INT");
    }

    #[test]
    fn test_native_enum() {
        let dialect = MysqlDialect::new();
        let col = Column::enumeration("status", ["a", "b"]);
        assert_eq!(dialect.render_column_type(&col).unwrap(), "ENUM('a','b')");
        assert_eq!(dialect.render_enum_clause(&col), None);

        let empty = Column::enumeration("status", Vec::<String>::new());
        assert!(dialect.render_column_type(&empty).is_err());
    }

    #[test]
    fn test_backslash_escaped_in_literals() {
        let dialect = MysqlDialect::new();
        let col = Column::new("dir", LogicalType::String)
            .with_default(DefaultValue::String("C:\\".into()));
        assert_eq!(dialect.render_default(&col).as_deref(), Some("'C:\\\\'"));

        let col = Column::enumeration("sep", ["\\", "/"]);
        assert_eq!(dialect.render_column_type(&col).unwrap(), "ENUM('\\\\','/')");

        assert_eq!(dialect.render_string("it's"), "'it''s'");
    }

    #[test]
    fn test_unsupported_types() {
        let dialect = MysqlDialect::new();
        for ty in [
            LogicalType::Interval,
            LogicalType::Inet,
            LogicalType::Unknown("geometry".into()),
        ] {
            let err = dialect.render_column_type(&Column::new("c", ty)).unwrap_err();
            assert!(matches!(err, ExportError::Dialect { ref dialect, .. } if dialect.as_str() == "mysql"));
        }
    }

    #[test]
    fn test_defaults() {
        let dialect = MysqlDialect::new();
        let col = Column::new("active", LogicalType::Boolean).with_default(DefaultValue::Boolean(false));
        assert_eq!(dialect.render_default(&col).as_deref(), Some("0"));

        let col = Column::new("uid", LogicalType::Uuid)
            .with_default(DefaultValue::Expression("uuid()".into()));
        assert_eq!(dialect.render_default(&col).as_deref(), Some("(uuid())"));
    }

    #[test]
    fn test_inline_indexes() {
        let dialect = MysqlDialect::new();
        let idx = Index::new("ix_email", ["email"], false);
        assert_eq!(
            dialect.render_inline_index("users", &idx).as_deref(),
            Some("KEY `ix_email` (`email`)")
        );
        let idx = Index::new("uq_email", ["email"], true);
        assert_eq!(
            dialect.render_inline_index("users", &idx).as_deref(),
            Some("UNIQUE KEY `uq_email` (`email`)")
        );
    }

    #[test]
    fn test_statement_hooks() {
        let dialect = MysqlDialect::new();
        assert_eq!(dialect.begin_transaction(), "START TRANSACTION");
        assert_eq!(dialect.commit_transaction(), "COMMIT");
        assert_eq!(dialect.drop_preamble(), vec!["SET FOREIGN_KEY_CHECKS = 0"]);
        assert_eq!(dialect.drop_postamble(), vec!["SET FOREIGN_KEY_CHECKS = 1"]);
        assert_eq!(dialect.render_drop_table("users"), "DROP TABLE IF EXISTS `users`");

        let fk = ForeignKey::new(["a_id"], "a", ["id"]);
        assert_eq!(dialect.render_drop_foreign_key("b", &fk), None);
    }

    #[test]
    fn test_auto_increment() {
        let dialect = MysqlDialect::new();
        let col = Column::new("id", LogicalType::Integer).primary_key().auto_increment();
        assert_eq!(dialect.render_auto_increment(&col).as_deref(), Some("AUTO_INCREMENT"));
        assert_eq!(dialect.render_auto_increment(&Column::new("n", LogicalType::Integer)), None);
    }
}
