//! Producer and consumer endpoints.
//!
//! Endpoints are tagged variants over the kinds of things a pipe can connect:
//!
//! | Kind     | Producer                          | Consumer                         |
//! |----------|-----------------------------------|----------------------------------|
//! | `Table`  | streams rows via a [`TableReader`] | writes rows via a [`TableWriter`] |
//! | `Stream` | file reference, cannot transfer   | file reference, cannot accept    |
//! | `Memory` | replays in-memory rows            | buffers rows in memory           |
//!
//! Every kind exposes the same minimal surface: an object name, an optional
//! database object, and the transfer (producer) or accept (consumer)
//! capability.
//!
//! # Partial writes
//!
//! When a transfer fails or is cancelled mid-stream the consumer is aborted
//! and reports what it kept: memory consumers discard the rows of the failed
//! transfer, table consumers keep what was already written, stream consumers
//! never receive anything.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::context::ExecutionContext;
use crate::core::schema::DatabaseObjectRef;
use crate::core::traits::{ReadOptions, TableReader, TableWriter};
use crate::core::value::{Batch, SqlValue};
use crate::error::{BoxError, Direction, PartialWrite, Result, XferError};
use crate::monitor::ProgressMonitor;

use super::properties::ProcessorProperties;

/// The kind of thing an endpoint addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    Table,
    Stream,
    Memory,
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointKind::Table => f.write_str("table"),
            EndpointKind::Stream => f.write_str("stream"),
            EndpointKind::Memory => f.write_str("memory"),
        }
    }
}

/// Options handed to a producer for one transfer.
#[derive(Debug, Clone)]
pub struct TransferOptions {
    /// Rows per batch.
    pub batch_size: usize,
    /// Batches the producer may read ahead of the consumer.
    pub channel_buffer: usize,
    /// Processor properties, passed through to the endpoints.
    pub properties: ProcessorProperties,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            batch_size: 10_000,
            channel_buffer: 4,
            properties: ProcessorProperties::default(),
        }
    }
}

/// Result of one successful producer → consumer transfer.
#[derive(Debug, Clone)]
pub struct TransferSummary {
    pub rows: u64,
    pub batches: u64,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl TransferSummary {
    fn started() -> Self {
        Self {
            rows: 0,
            batches: 0,
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
        }
    }
}

fn resolve_object(object: &DatabaseObjectRef, context: Option<&Arc<ExecutionContext>>) -> DatabaseObjectRef {
    match context {
        Some(ctx) => object.qualified_with(
            ctx.active_catalog_name().as_deref(),
            ctx.active_schema_name().as_deref(),
        ),
        None => object.clone(),
    }
}

// ===== Producers =====

/// Producer reading a database table.
#[derive(Clone)]
pub struct TableProducer {
    object: DatabaseObjectRef,
    context: Option<Arc<ExecutionContext>>,
    reader: Option<Arc<dyn TableReader>>,
}

impl fmt::Debug for TableProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableProducer")
            .field("object", &self.object)
            .field("context", &self.context.as_ref().map(|c| c.connection_id()))
            .field("has_reader", &self.reader.is_some())
            .finish()
    }
}

impl TableProducer {
    pub fn new(object: DatabaseObjectRef) -> Self {
        Self {
            object,
            context: None,
            reader: None,
        }
    }

    /// Resolve unqualified names against this connection's defaults.
    pub fn with_context(mut self, context: Arc<ExecutionContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_reader(mut self, reader: Arc<dyn TableReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn object(&self) -> &DatabaseObjectRef {
        &self.object
    }

    pub fn context(&self) -> Option<&Arc<ExecutionContext>> {
        self.context.as_ref()
    }

    /// The object qualified with the context's current defaults. No I/O.
    pub fn resolved_object(&self) -> DatabaseObjectRef {
        resolve_object(&self.object, self.context.as_ref())
    }

    async fn transfer(
        &self,
        monitor: &ProgressMonitor,
        consumer: &mut Consumer,
        options: &TransferOptions,
    ) -> Result<TransferSummary> {
        let Some(reader) = &self.reader else {
            return Err(XferError::unsupported(format!(
                "reading table {} without a table reader",
                self.object
            )));
        };
        if let Some(ctx) = &self.context {
            ctx.ensure_defaults(monitor).await?;
        }
        let table = self.resolved_object();

        consumer.begin(monitor, options).await?;
        info!("Transferring table {} into {}", table, consumer.describe());

        let cancel = monitor.token().child_token();
        // Stops the reader task once this transfer returns, however it ends.
        let _stop_reader = cancel.clone().drop_guard();
        let batches = reader.read_table(ReadOptions {
            table,
            batch_size: options.batch_size,
            channel_buffer: options.channel_buffer,
            cancel,
        });
        pump(monitor, batches, consumer).await
    }
}

/// Producer naming a file. Reading files is not available in this build.
#[derive(Debug, Clone, Default)]
pub struct StreamProducer {
    file_path: Option<String>,
}

impl StreamProducer {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: Some(file_path.into()),
        }
    }

    /// A stream producer not yet pointed at a file.
    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }
}

/// Producer replaying rows held in memory.
#[derive(Debug, Clone)]
pub struct MemoryProducer {
    name: String,
    rows: Vec<Vec<SqlValue>>,
}

impl MemoryProducer {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    async fn transfer(
        &self,
        monitor: &ProgressMonitor,
        consumer: &mut Consumer,
        options: &TransferOptions,
    ) -> Result<TransferSummary> {
        consumer.begin(monitor, options).await?;

        let chunks: Vec<Batch> = self
            .rows
            .chunks(options.batch_size.max(1))
            .map(|chunk| Batch::new(chunk.to_vec()))
            .collect();
        let (tx, rx) = mpsc::channel(chunks.len().max(1));
        for batch in chunks {
            // Capacity covers every batch, so this never fails.
            let _ = tx.try_send(Ok(batch));
        }
        drop(tx);

        pump(monitor, rx, consumer).await
    }
}

/// The source side of a pipe.
#[derive(Debug, Clone)]
pub enum Producer {
    Table(TableProducer),
    Stream(StreamProducer),
    Memory(MemoryProducer),
}

impl Producer {
    pub fn kind(&self) -> EndpointKind {
        match self {
            Producer::Table(_) => EndpointKind::Table,
            Producer::Stream(_) => EndpointKind::Stream,
            Producer::Memory(_) => EndpointKind::Memory,
        }
    }

    /// Addressable name; `None` while the endpoint is unbound.
    pub fn object_name(&self) -> Option<String> {
        match self {
            Producer::Table(p) => Some(p.object.full_name()),
            Producer::Stream(p) => p.file_path.clone(),
            Producer::Memory(p) => Some(p.name.clone()),
        }
    }

    /// The database object behind this endpoint, if it is database-backed.
    pub fn database_object(&self) -> Option<&DatabaseObjectRef> {
        match self {
            Producer::Table(p) => Some(&p.object),
            Producer::Stream(_) | Producer::Memory(_) => None,
        }
    }

    /// Stream data from this producer into `consumer`.
    ///
    /// # Errors
    ///
    /// - `Unsupported` if this producer cannot originate data; the consumer
    ///   is not touched
    /// - `Transfer` / `TransferCancelled` for mid-stream failures, carrying
    ///   the consumer's partial-write state
    pub async fn transfer_data(
        &self,
        monitor: &ProgressMonitor,
        consumer: &mut Consumer,
        options: &TransferOptions,
    ) -> Result<TransferSummary> {
        monitor.check()?;
        match self {
            Producer::Table(p) => p.transfer(monitor, consumer, options).await,
            Producer::Stream(p) => Err(XferError::unsupported(format!(
                "stream import from {}",
                p.file_path.as_deref().unwrap_or("<unbound file>")
            ))),
            Producer::Memory(p) => p.transfer(monitor, consumer, options).await,
        }
    }
}

// ===== Consumers =====

/// Consumer writing into a database table.
#[derive(Clone)]
pub struct TableConsumer {
    object: DatabaseObjectRef,
    context: Option<Arc<ExecutionContext>>,
    writer: Option<Arc<dyn TableWriter>>,
    target: Option<DatabaseObjectRef>,
    rows_written: u64,
}

impl fmt::Debug for TableConsumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableConsumer")
            .field("object", &self.object)
            .field("context", &self.context.as_ref().map(|c| c.connection_id()))
            .field("has_writer", &self.writer.is_some())
            .field("rows_written", &self.rows_written)
            .finish()
    }
}

impl TableConsumer {
    pub fn new(object: DatabaseObjectRef) -> Self {
        Self {
            object,
            context: None,
            writer: None,
            target: None,
            rows_written: 0,
        }
    }

    pub fn with_context(mut self, context: Arc<ExecutionContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_writer(mut self, writer: Arc<dyn TableWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn object(&self) -> &DatabaseObjectRef {
        &self.object
    }

    /// The object qualified with the context's current defaults. No I/O.
    pub fn resolved_object(&self) -> DatabaseObjectRef {
        resolve_object(&self.object, self.context.as_ref())
    }

    /// Rows written by the current (or last) transfer.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

/// Consumer naming a file. Writing files is not available in this build.
#[derive(Debug, Clone, Default)]
pub struct StreamConsumer {
    file_path: Option<String>,
}

impl StreamConsumer {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: Some(file_path.into()),
        }
    }

    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }
}

/// Consumer buffering rows in memory, optionally bounded.
#[derive(Debug, Clone)]
pub struct MemoryConsumer {
    name: String,
    rows: Vec<Vec<SqlValue>>,
    row_limit: Option<usize>,
    mark: usize,
}

impl MemoryConsumer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            row_limit: None,
            mark: 0,
        }
    }

    /// Reject writes that would grow the buffer past `limit` rows.
    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = Some(limit);
        self
    }

    pub fn rows(&self) -> &[Vec<SqlValue>] {
        &self.rows
    }
}

/// The target side of a pipe.
#[derive(Debug, Clone)]
pub enum Consumer {
    Table(TableConsumer),
    Stream(StreamConsumer),
    Memory(MemoryConsumer),
}

impl Consumer {
    pub fn kind(&self) -> EndpointKind {
        match self {
            Consumer::Table(_) => EndpointKind::Table,
            Consumer::Stream(_) => EndpointKind::Stream,
            Consumer::Memory(_) => EndpointKind::Memory,
        }
    }

    /// Addressable name; `None` while the endpoint is unbound.
    pub fn object_name(&self) -> Option<String> {
        match self {
            Consumer::Table(c) => Some(c.object.full_name()),
            Consumer::Stream(c) => c.file_path.clone(),
            Consumer::Memory(c) => Some(c.name.clone()),
        }
    }

    /// The database object behind this endpoint, if it is database-backed.
    pub fn database_object(&self) -> Option<&DatabaseObjectRef> {
        match self {
            Consumer::Table(c) => Some(&c.object),
            Consumer::Stream(_) | Consumer::Memory(_) => None,
        }
    }

    fn describe(&self) -> String {
        format!(
            "{} {}",
            self.kind(),
            self.object_name().unwrap_or_else(|| "<unbound>".to_string())
        )
    }

    /// Prepare to accept rows. Fails without side effects if the consumer
    /// cannot accept data.
    pub async fn begin(&mut self, monitor: &ProgressMonitor, _options: &TransferOptions) -> Result<()> {
        match self {
            Consumer::Table(c) => {
                if c.writer.is_none() {
                    return Err(XferError::unsupported(format!(
                        "writing table {} without a table writer",
                        c.object
                    )));
                }
                if let Some(ctx) = &c.context {
                    ctx.ensure_defaults(monitor).await?;
                }
                c.target = Some(c.resolved_object());
                c.rows_written = 0;
                Ok(())
            }
            Consumer::Stream(c) => Err(XferError::unsupported(format!(
                "stream export to {}",
                c.file_path.as_deref().unwrap_or("<unbound file>")
            ))),
            Consumer::Memory(c) => {
                c.mark = c.rows.len();
                Ok(())
            }
        }
    }

    /// Accept one batch; returns rows written.
    pub async fn write_batch(&mut self, batch: Batch) -> std::result::Result<u64, BoxError> {
        match self {
            Consumer::Table(c) => {
                let (Some(writer), Some(target)) = (&c.writer, &c.target) else {
                    return Err("table consumer was not started".into());
                };
                let written = writer.write_batch(target, batch).await?;
                c.rows_written += written;
                Ok(written)
            }
            Consumer::Stream(_) => Err("stream consumers cannot accept rows".into()),
            Consumer::Memory(c) => {
                if let Some(limit) = c.row_limit {
                    if c.rows.len() + batch.len() > limit {
                        return Err(format!("buffer {} is full ({} rows)", c.name, limit).into());
                    }
                }
                let written = batch.len() as u64;
                c.rows.extend(batch.rows);
                Ok(written)
            }
        }
    }

    /// Finish a successful transfer.
    pub async fn commit(&mut self) -> Result<()> {
        if let Consumer::Table(c) = self {
            debug!(
                "Committed {} rows into {}",
                c.rows_written,
                c.target.as_ref().unwrap_or(&c.object)
            );
        }
        Ok(())
    }

    /// Abandon a failed or cancelled transfer and report what was kept.
    pub fn abort(&mut self) -> PartialWrite {
        match self {
            Consumer::Table(c) if c.rows_written > 0 => PartialWrite::Retained {
                rows: c.rows_written,
            },
            Consumer::Table(_) | Consumer::Stream(_) => PartialWrite::Nothing,
            Consumer::Memory(c) => {
                if c.rows.len() > c.mark {
                    c.rows.truncate(c.mark);
                    PartialWrite::Truncated
                } else {
                    PartialWrite::Nothing
                }
            }
        }
    }
}

/// Move batches from `batches` into a started consumer until the channel
/// closes, a side fails, or the monitor is cancelled.
async fn pump(
    monitor: &ProgressMonitor,
    mut batches: mpsc::Receiver<std::result::Result<Batch, BoxError>>,
    consumer: &mut Consumer,
) -> Result<TransferSummary> {
    let start = Instant::now();
    let mut summary = TransferSummary::started();

    loop {
        let next = tokio::select! {
            biased;
            _ = monitor.token().cancelled() => {
                let partial = consumer.abort();
                warn!("Transfer into {} cancelled after {} rows ({})", consumer.describe(), summary.rows, partial);
                return Err(XferError::TransferCancelled { pipe: None, partial });
            }
            next = batches.recv() => next,
        };
        let Some(next) = next else {
            break;
        };

        let batch = match next {
            Ok(batch) => batch,
            Err(e) => {
                let partial = consumer.abort();
                return Err(XferError::transfer(Direction::Read, e.to_string(), partial));
            }
        };

        let rows = batch.len() as u64;
        if let Err(e) = consumer.write_batch(batch).await {
            let partial = consumer.abort();
            return Err(XferError::transfer(Direction::Write, e.to_string(), partial));
        }
        summary.rows += rows;
        summary.batches += 1;
        monitor.worked(rows);
    }

    consumer.commit().await?;
    summary.elapsed = start.elapsed();
    info!(
        "Transferred {} rows in {} batches into {} ({:.2}s)",
        summary.rows,
        summary.batches,
        consumer.describe(),
        summary.elapsed.as_secs_f64()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::SchemaCache;
    use crate::drivers::{DialectImpl, ExasolDialect};
    use crate::testing::{MemoryTableStore, ScriptedSessionProvider};

    fn rows(n: i64) -> Vec<Vec<SqlValue>> {
        (0..n).map(|i| vec![SqlValue::I64(i), SqlValue::Text(format!("row {}", i))]).collect()
    }

    fn options(batch_size: usize) -> TransferOptions {
        TransferOptions {
            batch_size,
            ..Default::default()
        }
    }

    fn sales_context() -> (Arc<ScriptedSessionProvider>, Arc<ExecutionContext>) {
        let provider = Arc::new(
            ScriptedSessionProvider::new().with_scalar("SELECT CURRENT_SCHEMA", Some("SALES")),
        );
        let ctx = Arc::new(ExecutionContext::new(
            provider.clone(),
            DialectImpl::Exasol(ExasolDialect::new()),
            Arc::new(SchemaCache::with_schemas(["SALES"])),
        ));
        (provider, ctx)
    }

    #[test]
    fn test_endpoint_names() {
        let stream = Producer::Stream(StreamProducer::new("/data/orders.csv"));
        assert_eq!(stream.object_name().as_deref(), Some("/data/orders.csv"));
        assert!(stream.database_object().is_none());
        assert_eq!(stream.kind(), EndpointKind::Stream);

        let unbound = Producer::Stream(StreamProducer::unbound());
        assert!(unbound.object_name().is_none());
        assert!(unbound.database_object().is_none());

        let table = Consumer::Table(TableConsumer::new(
            DatabaseObjectRef::new("ORDERS").with_schema("SALES"),
        ));
        assert_eq!(table.object_name().as_deref(), Some("SALES.ORDERS"));
        assert_eq!(table.database_object().unwrap().name, "ORDERS");
    }

    #[tokio::test]
    async fn test_stream_producer_is_unsupported_and_leaves_consumer() {
        let producer = Producer::Stream(StreamProducer::new("orders.csv"));
        let mut consumer = Consumer::Memory(MemoryConsumer::new("buffer"));
        if let Consumer::Memory(c) = &mut consumer {
            c.rows.push(vec![SqlValue::I64(7)]);
        }

        let err = producer
            .transfer_data(&ProgressMonitor::new(), &mut consumer, &TransferOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_unsupported());
        assert!(err.to_string().contains("orders.csv"));
        match &consumer {
            Consumer::Memory(c) => assert_eq!(c.rows(), &[vec![SqlValue::I64(7)]]),
            other => panic!("unexpected consumer {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_memory_to_memory_batches() {
        let producer = Producer::Memory(MemoryProducer::new("source", rows(25)));
        let mut consumer = Consumer::Memory(MemoryConsumer::new("target"));
        let monitor = ProgressMonitor::new();

        let summary = producer
            .transfer_data(&monitor, &mut consumer, &options(10))
            .await
            .unwrap();
        assert_eq!(summary.rows, 25);
        assert_eq!(summary.batches, 3);
        assert_eq!(monitor.work_done(), 25);
        match &consumer {
            Consumer::Memory(c) => assert_eq!(c.rows().len(), 25),
            other => panic!("unexpected consumer {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_memory_consumer_overflow_truncates_partial_rows() {
        let producer = Producer::Memory(MemoryProducer::new("source", rows(30)));
        let mut consumer = Consumer::Memory(MemoryConsumer::new("target").with_row_limit(15));

        let err = producer
            .transfer_data(&ProgressMonitor::new(), &mut consumer, &options(10))
            .await
            .unwrap_err();
        match &err {
            XferError::Transfer { direction, partial, .. } => {
                assert_eq!(*direction, Direction::Write);
                assert_eq!(*partial, PartialWrite::Truncated);
            }
            other => panic!("unexpected error {:?}", other),
        }
        match &consumer {
            Consumer::Memory(c) => assert!(c.rows().is_empty()),
            other => panic!("unexpected consumer {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancelled_monitor_fails_before_touching_consumer() {
        let producer = Producer::Memory(MemoryProducer::new("source", rows(5)));
        let mut consumer = Consumer::Memory(MemoryConsumer::new("target"));
        let monitor = ProgressMonitor::new();
        monitor.cancel();

        let err = producer
            .transfer_data(&monitor, &mut consumer, &options(2))
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        match &consumer {
            Consumer::Memory(c) => assert!(c.rows().is_empty()),
            other => panic!("unexpected consumer {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_table_to_table_resolves_default_schema() {
        let (provider, ctx) = sales_context();
        let store = Arc::new(MemoryTableStore::new());
        store.insert_table("SALES.ORDERS_SRC", rows(12));

        let producer = Producer::Table(
            TableProducer::new(DatabaseObjectRef::new("ORDERS_SRC"))
                .with_context(ctx.clone())
                .with_reader(store.clone()),
        );
        let mut consumer = Consumer::Table(
            TableConsumer::new(DatabaseObjectRef::new("ORDERS"))
                .with_context(ctx.clone())
                .with_writer(store.clone()),
        );

        let summary = producer
            .transfer_data(&ProgressMonitor::new(), &mut consumer, &options(5))
            .await
            .unwrap();
        assert_eq!(summary.rows, 12);
        assert_eq!(store.rows("SALES.ORDERS").unwrap().len(), 12);
        // Defaults were read once and reused by both endpoints.
        assert_eq!(provider.sessions_opened(), 1);
        match &consumer {
            Consumer::Table(c) => {
                assert_eq!(c.rows_written(), 12);
                assert_eq!(c.resolved_object().full_name(), "SALES.ORDERS");
            }
            other => panic!("unexpected consumer {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_table_consumer_failure_retains_written_rows() {
        let store = Arc::new(MemoryTableStore::new());
        store.limit_writes(8);
        let producer = Producer::Memory(MemoryProducer::new("source", rows(20)));
        let mut consumer = Consumer::Table(
            TableConsumer::new(DatabaseObjectRef::new("ORDERS").with_schema("SALES"))
                .with_writer(store.clone()),
        );

        let err = producer
            .transfer_data(&ProgressMonitor::new(), &mut consumer, &options(4))
            .await
            .unwrap_err();
        assert_eq!(err.partial_write(), Some(PartialWrite::Retained { rows: 8 }));
        assert_eq!(store.rows("SALES.ORDERS").unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_missing_source_table_is_read_failure() {
        let store = Arc::new(MemoryTableStore::new());
        let producer = Producer::Table(
            TableProducer::new(DatabaseObjectRef::new("NOPE").with_schema("SALES"))
                .with_reader(store.clone()),
        );
        let mut consumer = Consumer::Memory(MemoryConsumer::new("target"));

        let err = producer
            .transfer_data(&ProgressMonitor::new(), &mut consumer, &options(4))
            .await
            .unwrap_err();
        match err {
            XferError::Transfer { direction, partial, message, .. } => {
                assert_eq!(direction, Direction::Read);
                assert_eq!(partial, PartialWrite::Nothing);
                assert!(message.contains("SALES.NOPE"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_table_endpoints_without_capability_are_unsupported() {
        let producer = Producer::Table(TableProducer::new(DatabaseObjectRef::new("ORDERS")));
        let mut consumer = Consumer::Memory(MemoryConsumer::new("target"));
        let err = producer
            .transfer_data(&ProgressMonitor::new(), &mut consumer, &options(4))
            .await
            .unwrap_err();
        assert!(err.is_unsupported());

        let producer = Producer::Memory(MemoryProducer::new("source", rows(3)));
        let mut consumer = Consumer::Table(TableConsumer::new(DatabaseObjectRef::new("ORDERS")));
        let err = producer
            .transfer_data(&ProgressMonitor::new(), &mut consumer, &options(4))
            .await
            .unwrap_err();
        assert!(err.is_unsupported());

        let mut consumer = Consumer::Stream(StreamConsumer::new("out.csv"));
        let err = producer
            .transfer_data(&ProgressMonitor::new(), &mut consumer, &options(4))
            .await
            .unwrap_err();
        assert!(err.is_unsupported());
    }
}
