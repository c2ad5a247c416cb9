//! Core traits at the seams of the transfer library.
//!
//! - [`NamespaceDialect`]: driver-specific default-namespace SQL
//! - [`TableReader`]: streams rows out of a table for a table producer
//! - [`TableWriter`]: writes rows into a table for a table consumer
//!
//! Readers and writers are supplied by the surrounding application; the
//! library only fixes the contract.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::{BoxError, Result};

use super::schema::DatabaseObjectRef;
use super::value::Batch;

/// Driver-specific statements for reading and switching the default namespace.
///
/// # Design Pattern
///
/// This is a **Strategy**: each engine supplies its own statement text while
/// the execution context keeps one protocol for caching and notification.
pub trait NamespaceDialect: Send + Sync {
    /// Get the dialect identifier (e.g., "exasol", "postgres").
    fn name(&self) -> &str;

    /// Whether the active schema can be switched on a live session.
    fn supports_schema_change(&self) -> bool;

    /// Whether the active catalog can be switched on a live session.
    fn supports_catalog_change(&self) -> bool;

    /// Query returning the session's current schema as a single string.
    fn current_schema_query(&self) -> &str;

    /// Query returning the session's current catalog, if the engine has one.
    fn current_catalog_query(&self) -> Option<&str> {
        None
    }

    /// Build the statement that makes `schema` the default.
    ///
    /// # Errors
    ///
    /// `Validation` for names that cannot be quoted safely, `Unsupported`
    /// when the engine cannot switch schemas.
    fn switch_schema_statement(&self, schema: &str) -> Result<String>;

    /// Build the statement that makes `catalog` the default.
    fn switch_catalog_statement(&self, catalog: &str) -> Result<String>;
}

/// Options for reading rows from a table.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Table to read, already resolved against the context defaults.
    pub table: DatabaseObjectRef,
    /// Number of rows per batch.
    pub batch_size: usize,
    /// Number of batches the reader may run ahead of the consumer.
    pub channel_buffer: usize,
    /// Cancelled when the consumer stops pulling.
    pub cancel: CancellationToken,
}

/// Read rows from a table.
pub trait TableReader: Send + Sync {
    /// Start streaming rows from a table.
    ///
    /// Returns a channel receiver that yields batches of rows. The reader
    /// spawns a background task that populates the channel, enabling
    /// backpressure when the channel fills up. Dropping the receiver stops
    /// the task.
    fn read_table(&self, opts: ReadOptions) -> mpsc::Receiver<std::result::Result<Batch, BoxError>>;
}

/// Write rows to a table.
#[async_trait]
pub trait TableWriter: Send + Sync {
    /// Write a batch of rows, returning how many were written.
    async fn write_batch(
        &self,
        table: &DatabaseObjectRef,
        batch: Batch,
    ) -> std::result::Result<u64, BoxError>;
}
