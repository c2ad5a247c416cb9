//! PostgreSQL driver.
//!
//! - [`PostgresDialect`]: default-namespace statements for PostgreSQL

mod dialect;

pub use dialect::PostgresDialect;
