//! Helpers shared by the string-backed enum dialects (PostgreSQL, SQL Server).

use crate::core::schema::{Column, LogicalType};
use crate::core::traits::Dialect;
use crate::error::{ExportError, Result};

/// Column width for an enum stored as a string: the declared length, or the
/// longest allowed value.
pub(crate) fn enum_width(dialect: &str, col: &Column) -> Result<u32> {
    let values = col.enum_values.as_deref().unwrap_or_default();
    if values.is_empty() {
        return Err(ExportError::dialect(
            dialect,
            format!("enum column '{}' has no values", col.name),
        ));
    }
    let longest = values
        .iter()
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(1)
        .max(1);
    Ok(col.length.unwrap_or(longest as u32))
}

/// `CHECK (col IN (...))` for engines without a native enum type.
pub(crate) fn enum_check(dialect: &dyn Dialect, col: &Column) -> Option<String> {
    if col.logical_type != LogicalType::Enum {
        return None;
    }
    let values = col.enum_values.as_deref().filter(|v| !v.is_empty())?;
    let list: Vec<String> = values.iter().map(|v| dialect.render_string(v)).collect();
    Some(format!(
        "CHECK ({} IN ({}))",
        dialect.quote_ident(&col.name),
        list.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_width_prefers_declared_length() {
        let col = Column::enumeration("status", ["active", "off"]).with_length(20);
        assert_eq!(enum_width("postgres", &col).unwrap(), 20);
        let col = Column::enumeration("status", ["active", "off"]);
        assert_eq!(enum_width("postgres", &col).unwrap(), 6);
    }

    #[test]
    fn test_enum_width_requires_values() {
        let col = Column::enumeration("status", Vec::<String>::new());
        let err = enum_width("mssql", &col).unwrap_err();
        assert!(matches!(err, ExportError::Dialect { .. }));
    }
}
