//! Error types for the export library.

use thiserror::Error;

/// Exit code for configuration errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code when a requested table cannot be resolved.
pub const EXIT_UNKNOWN_TABLE: u8 = 2;
/// Exit code for structurally invalid schema input.
pub const EXIT_INVALID_SCHEMA: u8 = 3;
/// Exit code when the active dialect cannot render something.
pub const EXIT_DIALECT_ERROR: u8 = 4;
/// Exit code for failures reported by the schema reader.
pub const EXIT_READER_ERROR: u8 = 5;
/// Exit code for JSON/YAML serialization failures.
pub const EXIT_SERIALIZATION_ERROR: u8 = 6;
/// Exit code for file I/O failures.
pub const EXIT_IO_ERROR: u8 = 7;

/// Opaque failure raised by a [`SchemaReader`](crate::core::SchemaReader).
///
/// The export pipeline never inspects the wrapped error; it only carries it
/// back to the caller.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ReaderError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl ReaderError {
    /// Wrap any error produced by a reader implementation.
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        ReaderError(err.into())
    }

    /// Borrow the wrapped error.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

/// Main error type for export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// A requested table is not known to the reader.
    #[error("Unknown table: {table}")]
    UnknownTable { table: String },

    /// Structurally invalid schema input (duplicate names, malformed foreign keys, ...).
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// The active dialect has no rendering rule for a type or feature.
    #[error("Dialect error ({dialect}): {message}")]
    Dialect { dialect: String, message: String },

    /// Failure propagated from the schema reader.
    #[error("Schema reader error: {0}")]
    Reader(#[from] ReaderError),

    /// Configuration error (invalid YAML, missing fields, unknown engine, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ExportError {
    /// Create an UnknownTable error.
    pub fn unknown_table(table: impl Into<String>) -> Self {
        ExportError::UnknownTable {
            table: table.into(),
        }
    }

    /// Create a Dialect error.
    pub fn dialect(dialect: impl Into<String>, message: impl Into<String>) -> Self {
        ExportError::Dialect {
            dialect: dialect.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ExportError::Config(_) | ExportError::Yaml(_) => EXIT_CONFIG_ERROR,
            ExportError::UnknownTable { .. } => EXIT_UNKNOWN_TABLE,
            ExportError::InvalidSchema(_) => EXIT_INVALID_SCHEMA,
            ExportError::Dialect { .. } => EXIT_DIALECT_ERROR,
            ExportError::Reader(_) => EXIT_READER_ERROR,
            ExportError::Json(_) => EXIT_SERIALIZATION_ERROR,
            ExportError::Io(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Result type alias for [`SchemaReader`](crate::core::SchemaReader) methods.
pub type ReaderResult<T> = std::result::Result<T, ReaderError>;
