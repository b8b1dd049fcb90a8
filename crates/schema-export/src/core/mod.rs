//! Core abstractions for database-agnostic schema export.
//!
//! This module provides the foundational types and traits used throughout
//! the export pipeline:
//!
//! - [`schema`]: Table, column, index, and foreign key metadata types
//! - [`traits`]: The `SchemaReader` and `Dialect` capabilities
//! - [`identifier`]: Identifier validation and quoting helpers
//! - [`catalog`]: Dialect registry with a process-wide cache
//!
//! # Architecture
//!
//! The core module defines database-agnostic abstractions that are implemented
//! by driver modules (`drivers/mysql`, `drivers/postgres`, `drivers/mssql`).
//! Exporters only ever talk to these traits, so a new engine is added without
//! touching export code.
//!
//! # Design Patterns
//!
//! - **Registry**: `DialectCatalog` hands out shared dialect instances
//! - **Strategy**: `Dialect` provides interchangeable DDL syntax
//! - **Template Method**: Default trait method implementations define statement skeletons

pub mod catalog;
pub mod identifier;
pub mod schema;
pub mod traits;

// Re-export commonly used types for convenience
pub use catalog::DialectCatalog;
pub use schema::{
    Column, DefaultValue, ForeignKey, Index, LogicalType, ReferentialAction, Table, TableEntry,
    TableKind,
};
pub use traits::{Dialect, SchemaReader};
