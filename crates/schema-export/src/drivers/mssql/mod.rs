//! Microsoft SQL Server driver.
//!
//! This module provides MSSQL-specific implementations:
//!
//! - [`MssqlDialect`]: DDL syntax strategy for MSSQL
//! - [`logical_type`]: native type name mapping

mod dialect;
mod typemap;

pub use dialect::MssqlDialect;
pub use typemap::logical_type;
