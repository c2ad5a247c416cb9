//! Per-connection execution context and its default-namespace protocol.
//!
//! An [`ExecutionContext`] is the single source of truth for "which catalog and
//! schema would an unqualified name resolve against right now" on one
//! connection. It:
//!
//! - lazily determines the defaults with one introspection query
//!   ([`refresh_defaults`](ExecutionContext::refresh_defaults))
//! - switches them with a server round trip and commits only on success
//!   ([`set_default_schema`](ExecutionContext::set_default_schema),
//!   [`set_default_catalog`](ExecutionContext::set_default_catalog))
//! - notifies registered listeners after each committed change
//!
//! # Concurrency
//!
//! Refresh and set operations are serialized by a per-context async mutex, so
//! concurrent callers never interleave a statement with another caller's
//! commit. Plain reads go through a separate lock and never wait on I/O.

mod listener;

pub use listener::{DefaultsChange, DefaultsListener, ListenerId, NamespaceKind};

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::schema::{CatalogRef, SchemaRef, SchemaResolver};
use crate::core::traits::NamespaceDialect;
use crate::drivers::DialectImpl;
use crate::error::{Result, XferError};
use crate::monitor::ProgressMonitor;
use crate::session::{ExecutionPurpose, Session, SessionProvider};

use listener::ListenerList;

/// Opaque identity of the connection a context belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
struct DefaultsState {
    catalog: Option<String>,
    schema: Option<String>,
    initialized: bool,
    stale: bool,
}

/// Default-namespace state for one connection instance.
pub struct ExecutionContext {
    connection_id: ConnectionId,
    label: String,
    sessions: Arc<dyn SessionProvider>,
    dialect: DialectImpl,
    resolver: Arc<dyn SchemaResolver>,
    state: RwLock<DefaultsState>,
    /// Held across refresh/set so one mutation is in flight per connection.
    op_lock: Mutex<()>,
    listeners: ListenerList,
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("ExecutionContext")
            .field("connection_id", &self.connection_id)
            .field("label", &self.label)
            .field("dialect", &self.dialect.name())
            .field("catalog", &state.catalog)
            .field("schema", &state.schema)
            .field("initialized", &state.initialized)
            .finish()
    }
}

impl ExecutionContext {
    /// Create a context for a freshly opened connection.
    ///
    /// No I/O happens here; the defaults are read on first use.
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        dialect: DialectImpl,
        resolver: Arc<dyn SchemaResolver>,
    ) -> Self {
        Self {
            connection_id: ConnectionId::new(),
            label: "Main".to_string(),
            sessions,
            dialect,
            resolver,
            state: RwLock::new(DefaultsState::default()),
            op_lock: Mutex::new(()),
            listeners: ListenerList::default(),
        }
    }

    /// Use a specific connection identity.
    pub fn with_connection_id(mut self, id: ConnectionId) -> Self {
        self.connection_id = id;
        self
    }

    /// Set the human-readable label used in logs (e.g. "Main", "Metadata").
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn dialect(&self) -> &DialectImpl {
        &self.dialect
    }

    pub fn supports_schema_change(&self) -> bool {
        self.dialect.supports_schema_change()
    }

    pub fn supports_catalog_change(&self) -> bool {
        self.dialect.supports_catalog_change()
    }

    /// Name of the active schema, if known.
    pub fn active_schema_name(&self) -> Option<String> {
        self.read_state().schema.clone()
    }

    /// Name of the active catalog, if known.
    pub fn active_catalog_name(&self) -> Option<String> {
        self.read_state().catalog.clone()
    }

    /// Whether a refresh has completed and not been invalidated since.
    pub fn is_initialized(&self) -> bool {
        let state = self.read_state();
        state.initialized && !state.stale
    }

    /// The active schema resolved through the schema cache. Never performs I/O.
    pub fn default_schema(&self) -> Option<SchemaRef> {
        let name = self.active_schema_name()?;
        self.resolver.resolve_schema(&name)
    }

    /// The active catalog resolved through the schema cache. Never performs I/O.
    pub fn default_catalog(&self) -> Option<CatalogRef> {
        let name = self.active_catalog_name()?;
        self.resolver.resolve_catalog(&name)
    }

    /// Register a listener for committed default changes.
    pub fn add_listener(&self, listener: impl DefaultsListener + 'static) -> ListenerId {
        self.listeners.add(Arc::new(listener))
    }

    /// Unregister a listener. Returns false if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Mark the cached defaults as out of date, e.g. after a reconnect.
    ///
    /// The last known names stay readable until the next refresh replaces them.
    pub fn invalidate(&self) {
        self.write_state().stale = true;
        debug!("Defaults of connection {} invalidated", self.connection_id);
    }

    /// Refresh the defaults if they were never read or have been invalidated.
    pub async fn ensure_defaults(&self, monitor: &ProgressMonitor) -> Result<()> {
        let _guard = self.op_lock.lock().await;
        if self.is_initialized() {
            return Ok(());
        }
        self.refresh_locked(monitor).await.map(|_| ())
    }

    /// Read the session's current schema (and catalog, where the engine has
    /// one) from the server.
    ///
    /// Returns whether the known defaults changed. Listeners are notified for
    /// each part that changed, so repeated refreshes without an intervening
    /// mutation notify nothing.
    pub async fn refresh_defaults(&self, monitor: &ProgressMonitor) -> Result<bool> {
        let _guard = self.op_lock.lock().await;
        self.refresh_locked(monitor).await
    }

    /// Make `schema` the default schema of this connection.
    ///
    /// `None` and the already-active schema are no-ops without I/O, unless the
    /// defaults are stale.
    ///
    /// # Errors
    ///
    /// - `Unsupported` if the engine cannot switch schemas
    /// - `Validation` if the name cannot be placed in a statement safely
    /// - `Connection` if the session or statement fails; state is unchanged
    /// - `Cancelled` if the monitor was cancelled before the switch ran
    pub async fn set_default_schema(
        &self,
        monitor: &ProgressMonitor,
        schema: Option<&SchemaRef>,
    ) -> Result<()> {
        let Some(schema) = schema else {
            return Ok(());
        };
        let _guard = self.op_lock.lock().await;
        self.switch_schema_locked(monitor, schema.name()).await
    }

    /// Make `catalog` the default catalog, then optionally switch `schema`.
    ///
    /// Engines without catalog switching always fail with `Unsupported` and
    /// never open a session. After a catalog switch the schema is re-read on
    /// next use because the server may pick a different default.
    ///
    /// A schema that cannot be switched to fails before the catalog statement
    /// is issued, so an error never leaves the catalog half changed.
    pub async fn set_default_catalog(
        &self,
        monitor: &ProgressMonitor,
        catalog: Option<&CatalogRef>,
        schema: Option<&SchemaRef>,
    ) -> Result<()> {
        if !self.dialect.supports_catalog_change() {
            return Err(XferError::unsupported(format!(
                "changing the default catalog on {} connections",
                self.dialect.name()
            )));
        }

        let _guard = self.op_lock.lock().await;

        if let Some(schema) = schema {
            let catalog_switch = catalog
                .is_some_and(|c| self.active_catalog_name().as_deref() != Some(c.name.as_str()));
            if catalog_switch || self.schema_switch_pending(schema.name()) {
                self.schema_switch_statement(schema.name())?;
            }
        }
        if let Some(catalog) = catalog {
            self.switch_catalog_locked(monitor, &catalog.name).await?;
        }
        if let Some(schema) = schema {
            self.switch_schema_locked(monitor, schema.name()).await?;
        }
        Ok(())
    }

    async fn refresh_locked(&self, monitor: &ProgressMonitor) -> Result<bool> {
        let (schema, catalog) = {
            let mut session = self
                .open_session(monitor, ExecutionPurpose::Metadata, "Query active schema")
                .await?;
            let schema = session
                .query_scalar_string(self.dialect.current_schema_query())
                .await
                .map_err(|e| XferError::connection("querying active schema", e))?;
            let catalog = match self.dialect.current_catalog_query() {
                Some(query) => session
                    .query_scalar_string(query)
                    .await
                    .map_err(|e| XferError::connection("querying active catalog", e))?,
                None => None,
            };
            (schema, catalog)
        };
        monitor.check()?;

        let schema = normalize_name(schema);
        let catalog = normalize_name(catalog);

        let (old_catalog, old_schema) = {
            let mut state = self.write_state();
            let old = (state.catalog.clone(), state.schema.clone());
            state.catalog = catalog.clone();
            state.schema = schema.clone();
            state.initialized = true;
            state.stale = false;
            old
        };

        debug!(
            "Connection {} ({}) defaults: catalog={:?} schema={:?}",
            self.connection_id, self.label, catalog, schema
        );

        let mut changed = false;
        if old_catalog != catalog {
            changed = true;
            self.notify(NamespaceKind::Catalog, old_catalog, catalog);
        }
        if old_schema != schema {
            changed = true;
            self.notify(NamespaceKind::Schema, old_schema, schema);
        }
        Ok(changed)
    }

    async fn switch_schema_locked(&self, monitor: &ProgressMonitor, name: &str) -> Result<()> {
        if !self.schema_switch_pending(name) {
            debug!("Schema {} is already active on {}", name, self.connection_id);
            return Ok(());
        }
        let old = self.active_schema_name();
        let statement = self.schema_switch_statement(name)?;

        let mut session = self
            .open_session(monitor, ExecutionPurpose::Utility, "Set active schema")
            .await?;
        session
            .execute_statement(&statement)
            .await
            .map_err(|e| XferError::connection(format!("switching default schema to {}", name), e))?;

        self.write_state().schema = Some(name.to_string());
        info!(
            "Default schema of connection {} changed from {:?} to {}",
            self.connection_id, old, name
        );
        if old.as_deref() != Some(name) {
            self.notify(NamespaceKind::Schema, old, Some(name.to_string()));
        }
        drop(session);
        Ok(())
    }

    /// A cached name only counts as active while the defaults are not stale.
    fn schema_switch_pending(&self, name: &str) -> bool {
        let state = self.read_state();
        state.stale || state.schema.as_deref() != Some(name)
    }

    fn schema_switch_statement(&self, name: &str) -> Result<String> {
        if !self.dialect.supports_schema_change() {
            return Err(XferError::unsupported(format!(
                "changing the default schema on {} connections",
                self.dialect.name()
            )));
        }
        self.dialect.switch_schema_statement(name)
    }

    async fn switch_catalog_locked(&self, monitor: &ProgressMonitor, name: &str) -> Result<()> {
        let old = self.active_catalog_name();
        if old.as_deref() == Some(name) {
            debug!("Catalog {} is already active on {}", name, self.connection_id);
            return Ok(());
        }
        let statement = self.dialect.switch_catalog_statement(name)?;

        let mut session = self
            .open_session(monitor, ExecutionPurpose::Utility, "Set active catalog")
            .await?;
        session
            .execute_statement(&statement)
            .await
            .map_err(|e| XferError::connection(format!("switching default catalog to {}", name), e))?;

        {
            let mut state = self.write_state();
            state.catalog = Some(name.to_string());
            state.stale = true;
        }
        info!(
            "Default catalog of connection {} changed from {:?} to {}",
            self.connection_id, old, name
        );
        self.notify(NamespaceKind::Catalog, old, Some(name.to_string()));
        drop(session);
        Ok(())
    }

    async fn open_session(
        &self,
        monitor: &ProgressMonitor,
        purpose: ExecutionPurpose,
        task: &str,
    ) -> Result<Box<dyn Session>> {
        monitor.check()?;
        monitor.subtask(task);
        let session = self
            .sessions
            .open_session(monitor, purpose, task)
            .await
            .map_err(|e| XferError::connection(format!("opening {} session: {}", purpose, task), e))?;
        // The session is dropped (released) on this early return.
        monitor.check()?;
        Ok(session)
    }

    fn notify(&self, kind: NamespaceKind, old: Option<String>, new: Option<String>) {
        let change = DefaultsChange {
            connection: self.connection_id,
            kind,
            old,
            new,
        };
        self.listeners.notify(&change);
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, DefaultsState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, DefaultsState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Trim a server-reported name; blank means "none".
fn normalize_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
