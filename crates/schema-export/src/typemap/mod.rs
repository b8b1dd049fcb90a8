//! Mapping from native driver type names to logical types.
//!
//! Readers see raw type strings such as `int unsigned`, `character varying(255)`
//! or `nvarchar(max)`. [`RawType::parse`] splits off modifiers and arguments,
//! then the per-engine tables in `drivers::*::typemap` decide the logical type.

use crate::core::schema::LogicalType;
use crate::drivers;

/// A raw type name split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawType {
    /// Lowercased base name with arguments removed and whitespace collapsed
    /// (`timestamp(3) with time zone` becomes `timestamp with time zone`).
    pub base: String,

    /// Parenthesized arguments, trimmed and lowercased (`["10", "2"]`, `["max"]`).
    pub args: Vec<String>,

    /// `UNSIGNED` modifier present (MySQL).
    pub unsigned: bool,
}

impl RawType {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        let mut base = String::with_capacity(lower.len());
        let mut args = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;

        for ch in lower.chars() {
            match ch {
                '(' => {
                    depth += 1;
                }
                ')' if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        args.push(current.trim().to_string());
                        current.clear();
                    }
                }
                ',' if depth == 1 => {
                    args.push(current.trim().to_string());
                    current.clear();
                }
                _ if depth > 0 => current.push(ch),
                _ => base.push(ch),
            }
        }

        let mut unsigned = false;
        let words: Vec<&str> = base
            .split_whitespace()
            .filter(|w| match *w {
                "unsigned" => {
                    unsigned = true;
                    false
                }
                "signed" | "zerofill" => false,
                _ => true,
            })
            .collect();

        Self {
            base: words.join(" "),
            args,
            unsigned,
        }
    }

    /// First argument as a number, if it is one.
    pub fn first_arg(&self) -> Option<u32> {
        self.args.first().and_then(|a| a.parse().ok())
    }
}

/// Map a raw type name for `engine` to a logical type.
///
/// Returns `None` for unknown engines and for type names the engine's table
/// does not cover.
pub fn logical_type(engine: &str, raw: &str) -> Option<LogicalType> {
    let parsed = RawType::parse(raw);
    match drivers::normalize_engine(engine)? {
        "mysql" => drivers::mysql::logical_type(&parsed),
        "postgres" => drivers::postgres::logical_type(&parsed),
        "mssql" => drivers::mssql::logical_type(&parsed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_arguments_and_modifiers() {
        let raw = RawType::parse("INT(10) UNSIGNED ZEROFILL");
        assert_eq!(raw.base, "int");
        assert_eq!(raw.args, vec!["10"]);
        assert!(raw.unsigned);

        let raw = RawType::parse("timestamp(3) with time zone");
        assert_eq!(raw.base, "timestamp with time zone");
        assert_eq!(raw.first_arg(), Some(3));

        let raw = RawType::parse("decimal(10, 2)");
        assert_eq!(raw.args, vec!["10", "2"]);

        let raw = RawType::parse("NVARCHAR(MAX)");
        assert_eq!(raw.base, "nvarchar");
        assert_eq!(raw.args, vec!["max"]);
        assert_eq!(raw.first_arg(), None);
    }

    #[test]
    fn test_parse_enum_values_kept_as_args() {
        let raw = RawType::parse("enum('a','b')");
        assert_eq!(raw.base, "enum");
        assert_eq!(raw.args, vec!["'a'", "'b'"]);
    }

    #[test]
    fn test_logical_type_dispatch() {
        assert_eq!(logical_type("mariadb", "tinyint(1)"), Some(LogicalType::Boolean));
        assert_eq!(logical_type("pg", "character varying"), Some(LogicalType::String));
        assert_eq!(logical_type("sqlserver", "datetimeoffset"), Some(LogicalType::Timestamp));
        assert_eq!(logical_type("oracle", "varchar2"), None);
        assert_eq!(logical_type("postgres", "tsvector"), None);
    }
}
