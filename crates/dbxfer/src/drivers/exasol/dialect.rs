//! Exasol namespace dialect (Strategy pattern).
//!
//! Exasol has no catalogs; the session's schema is read from the
//! `CURRENT_SCHEMA` register and switched with `OPEN SCHEMA`.

use crate::core::identifier::quote_double;
use crate::core::traits::NamespaceDialect;
use crate::error::{Result, XferError};

const GET_CURRENT_SCHEMA: &str = "SELECT CURRENT_SCHEMA";

/// Exasol dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct ExasolDialect;

impl ExasolDialect {
    /// Create a new Exasol dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl NamespaceDialect for ExasolDialect {
    fn name(&self) -> &str {
        "exasol"
    }

    fn supports_schema_change(&self) -> bool {
        true
    }

    fn supports_catalog_change(&self) -> bool {
        false
    }

    fn current_schema_query(&self) -> &str {
        GET_CURRENT_SCHEMA
    }

    fn switch_schema_statement(&self, schema: &str) -> Result<String> {
        Ok(format!("OPEN SCHEMA {}", quote_double(schema)?))
    }

    fn switch_catalog_statement(&self, _catalog: &str) -> Result<String> {
        Err(XferError::unsupported("exasol has no catalogs to switch"))
    }
}
