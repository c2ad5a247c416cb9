//! Microsoft SQL Server driver.
//!
//! - [`MssqlDialect`]: default-namespace statements for SQL Server

mod dialect;

pub use dialect::MssqlDialect;
