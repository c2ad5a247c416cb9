//! Session boundary consumed by execution contexts.
//!
//! Sessions are supplied by the surrounding application. A session is a
//! scoped resource: it is released when the boxed handle is dropped, which
//! happens on every exit path of the call that opened it.

use std::fmt;

use async_trait::async_trait;

use crate::error::BoxError;
use crate::monitor::ProgressMonitor;

/// Why a session is being opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionPurpose {
    /// Metadata introspection (current schema, catalog lookups).
    Metadata,
    /// Utility statements issued on behalf of the tool (namespace switches).
    Utility,
    /// Statements originating from the user.
    UserQuery,
}

impl fmt::Display for ExecutionPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionPurpose::Metadata => f.write_str("meta"),
            ExecutionPurpose::Utility => f.write_str("util"),
            ExecutionPurpose::UserQuery => f.write_str("user"),
        }
    }
}

/// A live, scoped handle to a database connection.
#[async_trait]
pub trait Session: Send {
    /// Execute a statement, returning the affected row count.
    async fn execute_statement(&mut self, sql: &str) -> Result<u64, BoxError>;

    /// Run a query and return the first column of the first row as a string.
    ///
    /// Returns `None` when the query yields no row or a NULL value.
    async fn query_scalar_string(&mut self, sql: &str) -> Result<Option<String>, BoxError>;
}

/// Opens sessions on one connection instance.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Open a session for `purpose`; `task` labels the work for logs.
    async fn open_session(
        &self,
        monitor: &ProgressMonitor,
        purpose: ExecutionPurpose,
        task: &str,
    ) -> Result<Box<dyn Session>, BoxError>;
}
