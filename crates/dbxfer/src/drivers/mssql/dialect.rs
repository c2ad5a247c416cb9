//! SQL Server namespace dialect (Strategy pattern).
//!
//! The default schema of a SQL Server session is fixed by the login's user
//! mapping and cannot be changed per session; the database (catalog) can be
//! switched with `USE`.

use crate::core::identifier::quote_bracket;
use crate::core::traits::NamespaceDialect;
use crate::error::{Result, XferError};

/// SQL Server dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// Create a new SQL Server dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl NamespaceDialect for MssqlDialect {
    fn name(&self) -> &str {
        "mssql"
    }

    fn supports_schema_change(&self) -> bool {
        false
    }

    fn supports_catalog_change(&self) -> bool {
        true
    }

    fn current_schema_query(&self) -> &str {
        "SELECT SCHEMA_NAME()"
    }

    fn current_catalog_query(&self) -> Option<&str> {
        Some("SELECT DB_NAME()")
    }

    fn switch_schema_statement(&self, _schema: &str) -> Result<String> {
        Err(XferError::unsupported(
            "sql server sessions cannot change their default schema",
        ))
    }

    fn switch_catalog_statement(&self, catalog: &str) -> Result<String> {
        Ok(format!("USE {}", quote_bracket(catalog)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_statement() {
        let dialect = MssqlDialect::new();
        assert_eq!(dialect.switch_catalog_statement("Sales").unwrap(), "USE [Sales]");
        assert!(dialect.switch_catalog_statement("Sa]les").is_err());
    }

    #[test]
    fn test_schema_switch_unsupported() {
        let dialect = MssqlDialect::new();
        assert!(!dialect.supports_schema_change());
        assert!(dialect.switch_schema_statement("dbo").unwrap_err().is_unsupported());
    }
}
