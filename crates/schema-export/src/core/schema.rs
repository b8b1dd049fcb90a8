//! Schema model types for tables, columns, indexes, and foreign keys.
//!
//! These types are the engine-independent representation every reader
//! normalizes into and every exporter renders from. They are plain values:
//! an export call builds them fresh from reader output and never mutates
//! them afterwards.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// Engine-independent column type.
///
/// Serialized as its lowercase name. Names the model does not recognize are
/// kept as [`LogicalType::Unknown`] so they survive a JSON round trip and can
/// be reported by the dialect that fails to render them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogicalType {
    /// Variable-length character string.
    String,
    /// Fixed-length character string.
    Char,
    /// Unbounded text.
    Text,
    /// 8-bit integer.
    TinyInteger,
    /// 16-bit integer.
    SmallInteger,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInteger,
    /// Exact numeric with precision and scale.
    Decimal,
    /// Single-precision floating point.
    Float,
    /// Double-precision floating point.
    Double,
    /// Boolean.
    Boolean,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time without time zone.
    DateTime,
    /// Date and time with time zone.
    Timestamp,
    /// Binary data.
    Binary,
    /// 128-bit UUID.
    Uuid,
    /// JSON document.
    Json,
    /// One of a fixed list of string values.
    Enum,
    /// Time interval (PostgreSQL only).
    Interval,
    /// IP address (PostgreSQL only).
    Inet,
    /// A logical type name the model does not know.
    Unknown(String),
}

impl LogicalType {
    /// Parse a logical type name. Never fails; unrecognized names become `Unknown`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "string" => LogicalType::String,
            "char" => LogicalType::Char,
            "text" => LogicalType::Text,
            "tinyinteger" => LogicalType::TinyInteger,
            "smallinteger" => LogicalType::SmallInteger,
            "integer" => LogicalType::Integer,
            "biginteger" => LogicalType::BigInteger,
            "decimal" => LogicalType::Decimal,
            "float" => LogicalType::Float,
            "double" => LogicalType::Double,
            "boolean" => LogicalType::Boolean,
            "date" => LogicalType::Date,
            "time" => LogicalType::Time,
            "datetime" => LogicalType::DateTime,
            "timestamp" => LogicalType::Timestamp,
            "binary" => LogicalType::Binary,
            "uuid" => LogicalType::Uuid,
            "json" => LogicalType::Json,
            "enum" => LogicalType::Enum,
            "interval" => LogicalType::Interval,
            "inet" => LogicalType::Inet,
            _ => LogicalType::Unknown(name.to_string()),
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &str {
        match self {
            LogicalType::String => "string",
            LogicalType::Char => "char",
            LogicalType::Text => "text",
            LogicalType::TinyInteger => "tinyinteger",
            LogicalType::SmallInteger => "smallinteger",
            LogicalType::Integer => "integer",
            LogicalType::BigInteger => "biginteger",
            LogicalType::Decimal => "decimal",
            LogicalType::Float => "float",
            LogicalType::Double => "double",
            LogicalType::Boolean => "boolean",
            LogicalType::Date => "date",
            LogicalType::Time => "time",
            LogicalType::DateTime => "datetime",
            LogicalType::Timestamp => "timestamp",
            LogicalType::Binary => "binary",
            LogicalType::Uuid => "uuid",
            LogicalType::Json => "json",
            LogicalType::Enum => "enum",
            LogicalType::Interval => "interval",
            LogicalType::Inet => "inet",
            LogicalType::Unknown(name) => name,
        }
    }

    /// Whether the type is one of the integer kinds.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            LogicalType::TinyInteger
                | LogicalType::SmallInteger
                | LogicalType::Integer
                | LogicalType::BigInteger
        )
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for LogicalType {
    fn from(name: String) -> Self {
        LogicalType::parse(&name)
    }
}

impl From<LogicalType> for String {
    fn from(ty: LogicalType) -> Self {
        ty.as_str().to_string()
    }
}

/// Column default value.
///
/// `Column::default == None` means "no default"; `Some(DefaultValue::Null)`
/// is an explicit `DEFAULT NULL`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    /// Literal SQL NULL.
    Null,
    /// Boolean literal.
    Boolean(bool),
    /// Numeric literal, kept as text to avoid float round-off.
    Number(String),
    /// String literal (unescaped).
    String(String),
    /// The current timestamp at insert time.
    CurrentTimestamp,
    /// Raw SQL expression emitted verbatim.
    Expression(String),
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Logical type.
    #[serde(rename = "type")]
    pub logical_type: LogicalType,

    /// Maximum length for string/char/binary types.
    pub length: Option<u32>,

    /// Numeric precision, or fractional-second precision for temporal types.
    pub precision: Option<u32>,

    /// Numeric scale.
    pub scale: Option<u32>,

    /// Whether the column allows NULL.
    pub nullable: bool,

    /// Default value, if any.
    pub default: Option<DefaultValue>,

    /// Whether the column is part of the primary key.
    pub primary_key: bool,

    /// Whether the column is auto-incremented by the engine.
    pub auto_increment: bool,

    /// Allowed values for enum columns.
    pub enum_values: Option<Vec<String>>,
}

impl Column {
    /// Create a nullable column with no default.
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            length: None,
            precision: None,
            scale: None,
            nullable: true,
            default: None,
            primary_key: false,
            auto_increment: false,
            enum_values: None,
        }
    }

    /// Create an enum column over the given values.
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut col = Self::new(name, LogicalType::Enum);
        col.enum_values = Some(values.into_iter().map(Into::into).collect());
        col
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark as primary key. Primary key columns are never nullable.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}

/// Index metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: String,

    /// Indexed column names, in key order.
    pub columns: Vec<String>,

    /// Whether the index is unique.
    pub unique: bool,
}

impl Index {
    pub fn new<I, S>(name: impl Into<String>, columns: I, unique: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            unique,
        }
    }
}

/// Referential action for ON DELETE / ON UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    SetNull,
    SetDefault,
    NoAction,
}

impl ReferentialAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
            ReferentialAction::NoAction => "NO ACTION",
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Foreign key metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    /// Constraint name; generated from the table and columns when absent.
    pub name: Option<String>,

    /// Referencing column names.
    pub columns: Vec<String>,

    /// Referenced table name.
    pub referenced_table: String,

    /// Referenced column names, paired positionally with `columns`.
    pub referenced_columns: Vec<String>,

    /// ON DELETE action.
    pub on_delete: Option<ReferentialAction>,

    /// ON UPDATE action.
    pub on_update: Option<ReferentialAction>,
}

impl ForeignKey {
    pub fn new<I, J, S, T>(columns: I, referenced_table: impl Into<String>, referenced_columns: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
            referenced_table: referenced_table.into(),
            referenced_columns: referenced_columns.into_iter().map(Into::into).collect(),
            on_delete: None,
            on_update: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }

    /// Constraint name, generated as `fk_<table>_<columns>` when not set.
    pub fn constraint_name(&self, table: &str) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("fk_{}_{}", table, self.columns.join("_")))
    }

    /// Check the structural shape of the key.
    pub fn validate(&self, table: &str) -> Result<()> {
        if self.columns.is_empty() {
            return Err(ExportError::InvalidSchema(format!(
                "Foreign key on table '{}' has no columns",
                table
            )));
        }
        if self.referenced_table.is_empty() {
            return Err(ExportError::InvalidSchema(format!(
                "Foreign key {} on table '{}' has no referenced table",
                self.constraint_name(table),
                table
            )));
        }
        if self.referenced_columns.len() != self.columns.len() {
            return Err(ExportError::InvalidSchema(format!(
                "Foreign key {} on table '{}' maps {} column(s) to {} referenced column(s)",
                self.constraint_name(table),
                table,
                self.columns.len(),
                self.referenced_columns.len()
            )));
        }
        Ok(())
    }
}

/// Table metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Column definitions, in ordinal order.
    pub columns: Vec<Column>,

    /// Indexes (primary key excluded).
    pub indexes: Vec<Index>,

    /// Foreign key constraints.
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Find a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Primary key column names, in column order.
    pub fn primary_key(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Drop indexes and foreign keys that mention a column the table no longer has.
    ///
    /// Used after a column projection. Returns the names of what was removed.
    pub fn retain_covered_constraints(&mut self) -> Vec<String> {
        let present: HashSet<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        let mut removed = Vec::new();

        let table_name = self.name.clone();
        self.indexes.retain(|idx| {
            let keep = idx.columns.iter().all(|c| present.contains(c.as_str()));
            if !keep {
                removed.push(idx.name.clone());
            }
            keep
        });
        self.foreign_keys.retain(|fk| {
            let keep = fk.columns.iter().all(|c| present.contains(c.as_str()));
            if !keep {
                removed.push(fk.constraint_name(&table_name));
            }
            keep
        });

        removed
    }

    /// Validate table-level invariants.
    ///
    /// Checks the name, column uniqueness, enum value placement, index
    /// coverage, and the shape of every foreign key.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ExportError::InvalidSchema(
                "Table name cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for col in &self.columns {
            if col.name.is_empty() {
                return Err(ExportError::InvalidSchema(format!(
                    "Table '{}' has a column with an empty name",
                    self.name
                )));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(ExportError::InvalidSchema(format!(
                    "Table '{}' has duplicate column '{}'",
                    self.name, col.name
                )));
            }
            if col.enum_values.is_some() && col.logical_type != LogicalType::Enum {
                return Err(ExportError::InvalidSchema(format!(
                    "Column {}.{} has enum values but type '{}'",
                    self.name, col.name, col.logical_type
                )));
            }
        }

        for idx in &self.indexes {
            if idx.columns.is_empty() {
                return Err(ExportError::InvalidSchema(format!(
                    "Index '{}' on table '{}' has no columns",
                    idx.name, self.name
                )));
            }
            if let Some(missing) = idx.columns.iter().find(|c| !seen.contains(c.as_str())) {
                return Err(ExportError::InvalidSchema(format!(
                    "Index '{}' on table '{}' references unknown column '{}'",
                    idx.name, self.name, missing
                )));
            }
        }

        for fk in &self.foreign_keys {
            fk.validate(&self.name)?;
        }

        Ok(())
    }
}

/// Kind of relation listed by a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Table,
    View,
}

/// Entry returned by [`SchemaReader::tables`](crate::core::SchemaReader::tables).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TableKind,
}

impl TableEntry {
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TableKind::Table,
        }
    }
}
