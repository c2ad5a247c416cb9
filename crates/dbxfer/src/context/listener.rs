//! Change notifications for default-namespace mutations.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::ConnectionId;

/// Which part of the default namespace changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceKind {
    Catalog,
    Schema,
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceKind::Catalog => f.write_str("catalog"),
            NamespaceKind::Schema => f.write_str("schema"),
        }
    }
}

/// A committed change of a connection's default catalog or schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultsChange {
    pub connection: ConnectionId,
    pub kind: NamespaceKind,
    pub old: Option<String>,
    pub new: Option<String>,
}

/// Observer of default-namespace changes.
///
/// Called synchronously after the new state is committed and before the
/// mutating call returns. Keep implementations short; they run while the
/// context's operation lock is held.
pub trait DefaultsListener: Send + Sync {
    fn defaults_changed(&self, change: &DefaultsChange);
}

impl<F> DefaultsListener for F
where
    F: Fn(&DefaultsChange) + Send + Sync,
{
    fn defaults_changed(&self, change: &DefaultsChange) {
        self(change)
    }
}

/// Handle returned by listener registration, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
pub(crate) struct ListenerList {
    next_id: AtomicU64,
    entries: RwLock<Vec<(ListenerId, Arc<dyn DefaultsListener>)>>,
}

impl ListenerList {
    pub(crate) fn add(&self, listener: Arc<dyn DefaultsListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver to a snapshot so listeners may (un)register from the callback.
    pub(crate) fn notify(&self, change: &DefaultsChange) {
        let snapshot: Vec<Arc<dyn DefaultsListener>> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in snapshot {
            listener.defaults_changed(change);
        }
    }
}
