//! MySQL/MariaDB native type names to logical types.

use crate::core::schema::LogicalType;
use crate::typemap::RawType;

/// Map a parsed MySQL column type.
///
/// MySQL represents BOOLEAN as TINYINT(1); a `tinyint` whose display width
/// is 1 is treated as boolean, as is `bit(1)`.
pub fn logical_type(raw: &RawType) -> Option<LogicalType> {
    let ty = match raw.base.as_str() {
        // Boolean
        "bool" | "boolean" => LogicalType::Boolean,
        "tinyint" if raw.first_arg() == Some(1) => LogicalType::Boolean,
        "bit" if raw.first_arg().unwrap_or(1) == 1 => LogicalType::Boolean,
        "bit" => LogicalType::Binary,

        // Integer types; unsigned values outgrow the signed type of the same width
        "tinyint" if raw.unsigned => LogicalType::SmallInteger,
        "tinyint" => LogicalType::TinyInteger,
        "smallint" if raw.unsigned => LogicalType::Integer,
        "smallint" | "year" => LogicalType::SmallInteger,
        "mediumint" => LogicalType::Integer,
        "int" | "integer" if raw.unsigned => LogicalType::BigInteger,
        "int" | "integer" => LogicalType::Integer,
        "bigint" => LogicalType::BigInteger,

        // Decimal/numeric
        "decimal" | "numeric" | "dec" | "fixed" => LogicalType::Decimal,

        // Floating point
        "float" => LogicalType::Float,
        "double" | "double precision" | "real" => LogicalType::Double,

        // String types
        "char" => LogicalType::Char,
        "varchar" => LogicalType::String,
        "tinytext" | "text" | "mediumtext" | "longtext" => LogicalType::Text,

        // Binary types
        "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" => {
            LogicalType::Binary
        }

        // Date/time types
        "date" => LogicalType::Date,
        "time" => LogicalType::Time,
        "datetime" => LogicalType::DateTime,
        "timestamp" => LogicalType::Timestamp,

        // Special types
        "json" => LogicalType::Json,
        "enum" => LogicalType::Enum,

        _ => return None,
    };
    Some(ty)
}
