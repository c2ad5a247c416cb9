//! PostgreSQL namespace dialect (Strategy pattern).
//!
//! The default schema is the head of `search_path`. A connection is bound to
//! one database, so catalogs cannot be switched on a live session.

use crate::core::identifier::quote_double;
use crate::core::traits::NamespaceDialect;
use crate::error::{Result, XferError};

/// PostgreSQL dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Create a new PostgreSQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl NamespaceDialect for PostgresDialect {
    fn name(&self) -> &str {
        "postgres"
    }

    fn supports_schema_change(&self) -> bool {
        true
    }

    fn supports_catalog_change(&self) -> bool {
        false
    }

    fn current_schema_query(&self) -> &str {
        "SELECT current_schema()"
    }

    fn current_catalog_query(&self) -> Option<&str> {
        Some("SELECT current_database()")
    }

    fn switch_schema_statement(&self, schema: &str) -> Result<String> {
        Ok(format!("SET search_path TO {}", quote_double(schema)?))
    }

    fn switch_catalog_statement(&self, _catalog: &str) -> Result<String> {
        Err(XferError::unsupported(
            "postgres sessions cannot switch databases",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_path_statement() {
        let dialect = PostgresDialect::new();
        assert_eq!(
            dialect.switch_schema_statement("public").unwrap(),
            "SET search_path TO \"public\""
        );
        assert!(dialect.switch_schema_statement("").is_err());
    }

    #[test]
    fn test_reports_current_database_as_catalog() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.current_catalog_query(), Some("SELECT current_database()"));
        assert!(!dialect.supports_catalog_change());
    }
}
