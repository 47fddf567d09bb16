//! Observable retry state and its subscription registry.
//! Listeners are invoked synchronously, in registration order, on every
//! status transition of their key. UI-facing code reads nothing else.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use serde::Serialize;

/// Point-in-time projection of a queued task's retry progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetryStatus {
    pub key: String,
    pub attempt: u32,
    pub max_attempts: u32,
    pub is_retrying: bool,
}

type Listener = Arc<dyn Fn(&RetryStatus) + Send + Sync>;

/// Per-key publish/subscribe registry for [`RetryStatus`] transitions.
#[derive(Default)]
pub(crate) struct RetryListeners {
    entries: Mutex<HashMap<String, Vec<(u64, Listener)>>>,
    next_id: AtomicU64,
}

impl RetryListeners {
    pub(crate) fn subscribe(&self, key: &str, listener: Listener) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.lock().unwrap();
        entries.entry(key.to_string()).or_default().push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&self, key: &str, id: u64) {
        let mut entries = self.entries.lock().unwrap();
        if let Some(listeners) = entries.get_mut(key) {
            listeners.retain(|(lid, _)| *lid != id);
            if listeners.is_empty() {
                entries.remove(key);
            }
        }
    }

    /// Deliver `status` to every listener of its key.
    /// The snapshot is taken under the lock but callbacks run outside it,
    /// so a listener may safely subscribe or unsubscribe.
    pub(crate) fn notify(&self, status: &RetryStatus) {
        let snapshot: Vec<Listener> = {
            let entries = self.entries.lock().unwrap();
            match entries.get(&status.key) {
                Some(listeners) => listeners.iter().map(|(_, l)| Arc::clone(l)).collect(),
                None => return,
            }
        };
        for listener in snapshot {
            listener(status);
        }
    }
}

/// Subscription handle returned by `TaskQueue::add_retry_listener`.
/// Unsubscribes on [`RetryListenerHandle::unsubscribe`] or on drop,
/// whichever comes first.
pub struct RetryListenerHandle {
    key: String,
    id: u64,
    registry: Weak<RetryListeners>,
}

impl RetryListenerHandle {
    pub(crate) fn new(key: String, id: u64, registry: Weak<RetryListeners>) -> Self {
        RetryListenerHandle { key, id, registry }
    }

    /// Remove the listener now instead of waiting for drop.
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for RetryListenerHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(&self.key, self.id);
        }
    }
}
