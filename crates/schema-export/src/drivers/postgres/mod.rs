//! PostgreSQL driver.
//!
//! This module provides PostgreSQL-specific implementations:
//!
//! - [`PostgresDialect`]: DDL syntax strategy for PostgreSQL
//! - [`logical_type`]: native type name mapping

mod dialect;
mod typemap;

pub use dialect::PostgresDialect;
pub use typemap::logical_type;
