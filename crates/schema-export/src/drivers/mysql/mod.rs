//! MySQL/MariaDB driver.
//!
//! This module provides MySQL-specific implementations for:
//! - [`MysqlDialect`]: DDL syntax strategy
//! - [`logical_type`]: native type name mapping
//!
//! # Supported Versions
//!
//! - MySQL 8.0.13+
//! - MariaDB 10.2+

mod dialect;
mod typemap;

pub use dialect::MysqlDialect;
pub use typemap::logical_type;
