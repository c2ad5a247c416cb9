//! Exasol driver.
//!
//! - [`ExasolDialect`]: default-namespace statements for Exasol

mod dialect;

pub use dialect::ExasolDialect;
