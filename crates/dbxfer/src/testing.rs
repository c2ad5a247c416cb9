//! Testing utilities for contexts and pipes.
//!
//! Provides an in-memory session provider that records every round trip and
//! an in-memory table store implementing both [`TableReader`] and
//! [`TableWriter`].

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::schema::DatabaseObjectRef;
use crate::core::traits::{ReadOptions, TableReader, TableWriter};
use crate::core::value::{Batch, SqlValue};
use crate::error::BoxError;
use crate::monitor::ProgressMonitor;
use crate::session::{ExecutionPurpose, Session, SessionProvider};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct Script {
    scalars: Mutex<HashMap<String, Option<String>>>,
    statements: Mutex<Vec<String>>,
    queries: Mutex<Vec<String>>,
    purposes: Mutex<Vec<ExecutionPurpose>>,
    fail_open: AtomicBool,
    fail_statements: AtomicBool,
    statement_delay_ms: AtomicU64,
    opened: AtomicUsize,
    released: AtomicUsize,
}

/// Session provider answering scalar queries from a script.
///
/// Unscripted queries return `None`. Every executed statement is recorded in
/// order, and sessions count themselves open and released.
#[derive(Debug, Default)]
pub struct ScriptedSessionProvider {
    script: Arc<Script>,
}

impl ScriptedSessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answer to `query`.
    pub fn with_scalar(self, query: &str, value: Option<&str>) -> Self {
        self.set_scalar(query, value);
        self
    }

    pub fn set_scalar(&self, query: &str, value: Option<&str>) {
        lock(&self.script.scalars).insert(query.to_string(), value.map(str::to_string));
    }

    /// Make `open_session` fail.
    pub fn fail_open(&self, fail: bool) {
        self.script.fail_open.store(fail, Ordering::SeqCst);
    }

    /// Make `execute_statement` fail.
    pub fn fail_statements(&self, fail: bool) {
        self.script.fail_statements.store(fail, Ordering::SeqCst);
    }

    /// Sleep this long inside every statement.
    pub fn set_statement_delay(&self, delay: Duration) {
        self.script
            .statement_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Statements executed so far, in order.
    pub fn statements(&self) -> Vec<String> {
        lock(&self.script.statements).clone()
    }

    /// Scalar queries issued so far, in order.
    pub fn queries(&self) -> Vec<String> {
        lock(&self.script.queries).clone()
    }

    /// Purposes of the sessions opened so far, in order.
    pub fn purposes(&self) -> Vec<ExecutionPurpose> {
        lock(&self.script.purposes).clone()
    }

    pub fn sessions_opened(&self) -> usize {
        self.script.opened.load(Ordering::SeqCst)
    }

    pub fn sessions_released(&self) -> usize {
        self.script.released.load(Ordering::SeqCst)
    }

    /// Sessions opened but not yet released.
    pub fn open_sessions(&self) -> usize {
        self.sessions_opened() - self.sessions_released()
    }
}

#[async_trait]
impl SessionProvider for ScriptedSessionProvider {
    async fn open_session(
        &self,
        _monitor: &ProgressMonitor,
        purpose: ExecutionPurpose,
        _task: &str,
    ) -> Result<Box<dyn Session>, BoxError> {
        if self.script.fail_open.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused").into());
        }
        self.script.opened.fetch_add(1, Ordering::SeqCst);
        lock(&self.script.purposes).push(purpose);
        Ok(Box::new(ScriptedSession {
            script: self.script.clone(),
        }))
    }
}

struct ScriptedSession {
    script: Arc<Script>,
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        self.script.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Session for ScriptedSession {
    async fn execute_statement(&mut self, sql: &str) -> Result<u64, BoxError> {
        let delay = self.script.statement_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.script.fail_statements.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, format!("statement failed: {}", sql)).into());
        }
        lock(&self.script.statements).push(sql.to_string());
        Ok(0)
    }

    async fn query_scalar_string(&mut self, sql: &str) -> Result<Option<String>, BoxError> {
        lock(&self.script.queries).push(sql.to_string());
        Ok(lock(&self.script.scalars).get(sql).cloned().flatten())
    }
}

/// In-memory tables keyed by full name, readable and writable by pipes.
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: Arc<Mutex<HashMap<String, Vec<Vec<SqlValue>>>>>,
    write_limit: Mutex<Option<u64>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a table.
    pub fn insert_table(&self, full_name: &str, rows: Vec<Vec<SqlValue>>) {
        lock(&self.tables).insert(full_name.to_string(), rows);
    }

    /// Rows currently stored in a table.
    pub fn rows(&self, full_name: &str) -> Option<Vec<Vec<SqlValue>>> {
        lock(&self.tables).get(full_name).cloned()
    }

    /// Fail any write that would push a table past `rows` rows.
    pub fn limit_writes(&self, rows: u64) {
        *lock(&self.write_limit) = Some(rows);
    }
}

impl TableReader for MemoryTableStore {
    fn read_table(&self, opts: ReadOptions) -> mpsc::Receiver<Result<Batch, BoxError>> {
        let (tx, rx) = mpsc::channel(opts.channel_buffer.max(1));
        let rows = lock(&self.tables).get(&opts.table.full_name()).cloned();
        let batch_size = opts.batch_size.max(1);

        tokio::spawn(async move {
            let Some(rows) = rows else {
                let err: BoxError = format!("table {} does not exist", opts.table).into();
                let _ = tx.send(Err(err)).await;
                return;
            };
            for chunk in rows.chunks(batch_size) {
                if opts.cancel.is_cancelled() {
                    return;
                }
                if tx.send(Ok(Batch::new(chunk.to_vec()))).await.is_err() {
                    return;
                }
            }
        });

        rx
    }
}

#[async_trait]
impl TableWriter for MemoryTableStore {
    async fn write_batch(&self, table: &DatabaseObjectRef, batch: Batch) -> Result<u64, BoxError> {
        let limit = *lock(&self.write_limit);
        let mut tables = lock(&self.tables);
        let rows = tables.entry(table.full_name()).or_default();
        if let Some(limit) = limit {
            if rows.len() as u64 + batch.len() as u64 > limit {
                return Err(format!("table {} is full ({} rows)", table, limit).into());
            }
        }
        let written = batch.len() as u64;
        rows.extend(batch.rows);
        Ok(written)
    }
}
