//! Identifier validation and quoting for namespace-switch statements.
//!
//! Schema and catalog names cannot be bound as statement parameters, so a
//! namespace switch has to splice the name into SQL text. Names are checked
//! before any statement is built:
//!
//! 1. Reject empty names, null bytes and names over the length limit
//! 2. Reject names containing the dialect's quote characters
//! 3. Wrap the remaining name in the dialect's quotes
//!
//! Quote characters are rejected rather than escaped: a catalog object whose
//! name needs escaping is almost certainly a mistake, and refusing it keeps the
//! generated statement trivially correct.

use crate::error::{Result, XferError};

/// Maximum identifier length (conservative limit across databases).
/// - PostgreSQL: 63 bytes
/// - SQL Server: 128 characters
/// - Exasol: 128 characters
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier for security issues.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes
/// - Identifiers exceeding maximum length
///
/// # Errors
///
/// Returns `XferError::Validation` with a descriptive message.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(XferError::Validation(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(XferError::Validation(format!(
            "Identifier contains null byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(XferError::Validation(format!(
            "Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote `name` between `open` and `close`, refusing names that contain either.
pub fn quote_strict(name: &str, open: char, close: char) -> Result<String> {
    validate_identifier(name)?;
    if name.contains(open) || name.contains(close) {
        return Err(XferError::Validation(format!(
            "Identifier contains quote character {:?}: {:?}",
            if name.contains(open) { open } else { close },
            name
        )));
    }
    Ok(format!("{}{}{}", open, name, close))
}

/// Quote an identifier with double quotes (PostgreSQL, Exasol).
pub fn quote_double(name: &str) -> Result<String> {
    quote_strict(name, '"', '"')
}

/// Quote a SQL Server identifier with brackets.
pub fn quote_bracket(name: &str) -> Result<String> {
    quote_strict(name, '[', ']')
}
