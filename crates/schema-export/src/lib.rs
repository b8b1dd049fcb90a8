//! # schema-export
//!
//! Normalize relational schema metadata and export it as dialect-correct DDL
//! or as a structured JSON document.
//!
//! The library provides:
//!
//! - **Schema Model** of tables, columns, indexes and foreign keys
//! - **Dependency resolution** giving a creation order for tables that reference
//!   each other, with cycle-breaking foreign keys deferred
//! - **Dialects** for MySQL/MariaDB, PostgreSQL and SQL Server
//! - **DDL export** as an ordered, transaction-wrapped script
//! - **Structured export** as a versioned JSON document that reads back losslessly
//!
//! ## Example
//!
//! ```rust,no_run
//! use schema_export::{DdlExporter, ExportRequest, MemoryReader};
//!
//! fn main() -> schema_export::Result<()> {
//!     let reader = MemoryReader::from_json_file("postgres", "schema.json")?;
//!     let script = DdlExporter::new(&reader)?
//!         .export(&ExportRequest::new(["users", "orders"]))?;
//!     print!("{}", script);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod export;
pub mod reader;
pub mod resolver;
pub mod typemap;

// Re-exports for convenient access
pub use crate::core::{
    Column, DefaultValue, Dialect, DialectCatalog, ForeignKey, Index, LogicalType,
    ReferentialAction, SchemaReader, Table, TableEntry, TableKind,
};
pub use config::{ExportConfig, ExportSettings, SourceConfig};
pub use error::{ExportError, ReaderError, ReaderResult, Result};
pub use export::{
    DdlExporter, DdlScript, ExportOptions, ExportRequest, SchemaDocument, StructuredExporter,
    TableRequest,
};
pub use reader::MemoryReader;
pub use resolver::{resolve, DeferReason, DeferredForeignKey, Resolution};
