//! SQL Server native type names to logical types.

use crate::core::schema::LogicalType;
use crate::typemap::RawType;

/// Map a parsed SQL Server column type.
pub fn logical_type(raw: &RawType) -> Option<LogicalType> {
    let is_max = raw.args.first().map(String::as_str) == Some("max");
    let ty = match raw.base.as_str() {
        // Boolean
        "bit" => LogicalType::Boolean,

        // Integer types
        "tinyint" => LogicalType::TinyInteger,
        "smallint" => LogicalType::SmallInteger,
        "int" => LogicalType::Integer,
        "bigint" => LogicalType::BigInteger,

        // Decimal/numeric
        "decimal" | "numeric" | "money" | "smallmoney" => LogicalType::Decimal,

        // Floating point; float(n) with n <= 24 is single precision
        "real" => LogicalType::Float,
        "float" => match raw.first_arg() {
            Some(n) if n <= 24 => LogicalType::Float,
            _ => LogicalType::Double,
        },

        // String types
        "char" | "nchar" => LogicalType::Char,
        "varchar" | "nvarchar" if is_max => LogicalType::Text,
        "varchar" | "nvarchar" => LogicalType::String,
        "text" | "ntext" | "xml" => LogicalType::Text,

        // Binary types
        "binary" | "varbinary" | "image" | "rowversion" | "timestamp" => LogicalType::Binary,

        // Date/time types
        "date" => LogicalType::Date,
        "time" => LogicalType::Time,
        "datetime" | "datetime2" | "smalldatetime" => LogicalType::DateTime,
        "datetimeoffset" => LogicalType::Timestamp,

        // GUID
        "uniqueidentifier" => LogicalType::Uuid,

        _ => return None,
    };
    Some(ty)
}
