//! PostgreSQL native type names to logical types.

use crate::core::schema::LogicalType;
use crate::typemap::RawType;

/// Map a parsed PostgreSQL column type.
///
/// Accepts both the SQL-standard spellings reported by
/// `information_schema` and the internal `pg_type` names (`int4`, `bpchar`).
pub fn logical_type(raw: &RawType) -> Option<LogicalType> {
    let ty = match raw.base.as_str() {
        // Boolean
        "bool" | "boolean" => LogicalType::Boolean,

        // Integer types
        "int2" | "smallint" | "smallserial" | "serial2" => LogicalType::SmallInteger,
        "int4" | "integer" | "int" | "serial" | "serial4" => LogicalType::Integer,
        "int8" | "bigint" | "bigserial" | "serial8" => LogicalType::BigInteger,

        // Decimal/numeric
        "numeric" | "decimal" | "money" => LogicalType::Decimal,

        // Floating point
        "float4" | "real" => LogicalType::Float,
        "float8" | "double precision" => LogicalType::Double,
        "float" => match raw.first_arg() {
            Some(p) if p <= 24 => LogicalType::Float,
            _ => LogicalType::Double,
        },

        // String types
        "char" | "character" | "bpchar" => LogicalType::Char,
        "varchar" | "character varying" | "name" | "citext" => LogicalType::String,
        "text" => LogicalType::Text,

        // Binary types
        "bytea" => LogicalType::Binary,

        // Date/time types
        "date" => LogicalType::Date,
        "time" | "time without time zone" | "timetz" | "time with time zone" => LogicalType::Time,
        "timestamp" | "timestamp without time zone" => LogicalType::DateTime,
        "timestamptz" | "timestamp with time zone" => LogicalType::Timestamp,
        "interval" => LogicalType::Interval,

        // Special types
        "uuid" => LogicalType::Uuid,
        "json" | "jsonb" => LogicalType::Json,
        "inet" | "cidr" => LogicalType::Inet,

        _ => return None,
    };
    Some(ty)
}
