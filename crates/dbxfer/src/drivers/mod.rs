//! Database driver implementations.
//!
//! This module provides engine-specific implementations of
//! [`NamespaceDialect`]:
//!
//! - [`exasol`]: Exasol (schema switching via `OPEN SCHEMA`)
//! - [`postgres`]: PostgreSQL (schema switching via `search_path`)
//! - [`mssql`]: Microsoft SQL Server (catalog switching via `USE`)
//!
//! # Static dispatch
//!
//! [`DialectImpl`] wraps the built-in dialects in an enum so execution
//! contexts hold a concrete value instead of a `Box<dyn NamespaceDialect>`.
//!
//! # Adding New Databases
//!
//! 1. Create a new module under `drivers/` with a `dialect.rs`
//! 2. Implement `NamespaceDialect`
//! 3. Add an enum variant to `DialectImpl` and a name in `from_db_type`

pub mod exasol;
pub mod mssql;
pub mod postgres;

pub use exasol::ExasolDialect;
pub use mssql::MssqlDialect;
pub use postgres::PostgresDialect;

use crate::core::traits::NamespaceDialect;
use crate::error::{Result, XferError};

/// Enum-based static dispatch for namespace dialects.
#[derive(Debug, Clone)]
pub enum DialectImpl {
    Exasol(ExasolDialect),
    Mssql(MssqlDialect),
    Postgres(PostgresDialect),
}

impl NamespaceDialect for DialectImpl {
    fn name(&self) -> &str {
        match self {
            DialectImpl::Exasol(d) => d.name(),
            DialectImpl::Mssql(d) => d.name(),
            DialectImpl::Postgres(d) => d.name(),
        }
    }

    fn supports_schema_change(&self) -> bool {
        match self {
            DialectImpl::Exasol(d) => d.supports_schema_change(),
            DialectImpl::Mssql(d) => d.supports_schema_change(),
            DialectImpl::Postgres(d) => d.supports_schema_change(),
        }
    }

    fn supports_catalog_change(&self) -> bool {
        match self {
            DialectImpl::Exasol(d) => d.supports_catalog_change(),
            DialectImpl::Mssql(d) => d.supports_catalog_change(),
            DialectImpl::Postgres(d) => d.supports_catalog_change(),
        }
    }

    fn current_schema_query(&self) -> &str {
        match self {
            DialectImpl::Exasol(d) => d.current_schema_query(),
            DialectImpl::Mssql(d) => d.current_schema_query(),
            DialectImpl::Postgres(d) => d.current_schema_query(),
        }
    }

    fn current_catalog_query(&self) -> Option<&str> {
        match self {
            DialectImpl::Exasol(d) => d.current_catalog_query(),
            DialectImpl::Mssql(d) => d.current_catalog_query(),
            DialectImpl::Postgres(d) => d.current_catalog_query(),
        }
    }

    fn switch_schema_statement(&self, schema: &str) -> Result<String> {
        match self {
            DialectImpl::Exasol(d) => d.switch_schema_statement(schema),
            DialectImpl::Mssql(d) => d.switch_schema_statement(schema),
            DialectImpl::Postgres(d) => d.switch_schema_statement(schema),
        }
    }

    fn switch_catalog_statement(&self, catalog: &str) -> Result<String> {
        match self {
            DialectImpl::Exasol(d) => d.switch_catalog_statement(catalog),
            DialectImpl::Mssql(d) => d.switch_catalog_statement(catalog),
            DialectImpl::Postgres(d) => d.switch_catalog_statement(catalog),
        }
    }
}

impl DialectImpl {
    /// Create a dialect implementation from a database type string.
    ///
    /// # Errors
    ///
    /// Returns an error if the database type is not recognized.
    pub fn from_db_type(db_type: &str) -> Result<Self> {
        match db_type.to_lowercase().as_str() {
            "exasol" | "exa" => Ok(DialectImpl::Exasol(ExasolDialect::new())),
            "mssql" | "sqlserver" | "sql_server" => Ok(DialectImpl::Mssql(MssqlDialect::new())),
            "postgres" | "postgresql" | "pg" => Ok(DialectImpl::Postgres(PostgresDialect::new())),
            other => Err(XferError::Config(format!(
                "Unknown database type: '{}'. Supported types: exasol, mssql, postgres",
                other
            ))),
        }
    }
}
