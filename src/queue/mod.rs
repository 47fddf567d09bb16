//! Retryable single-flight task queue.
//!
//! One worker drains one FIFO across all keys, so exactly one action is in
//! flight system-wide at any moment. Feature stores rely on that to avoid
//! overlapping backend calls during startup; do not make this per-key
//! concurrent. Failed actions retry with exponential backoff up to a bound,
//! and every transition is observable per key through [`RetryStatus`].

pub mod status;

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
pub use status::{RetryListenerHandle, RetryStatus};
use status::RetryListeners;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Total attempts per task, first try included.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

type BoxedAction =
    Box<dyn Fn() -> Pin<Box<dyn Future<Output = AppResult<()>> + Send>> + Send + Sync>;

struct QueuedTask {
    key: String,
    action: BoxedAction,
    /// Queue generation at enqueue time; clear() bumps the counter and the
    /// worker discards anything older.
    generation: u64,
    done: oneshot::Sender<AppResult<()>>,
}

struct Shared {
    cfg: QueueConfig,
    active: Mutex<HashSet<String>>,
    statuses: Mutex<HashMap<String, RetryStatus>>,
    listeners: Arc<RetryListeners>,
    generation: AtomicU64,
}

impl Shared {
    fn status_for(&self, key: &str, attempt: u32, is_retrying: bool) -> RetryStatus {
        RetryStatus {
            key: key.to_string(),
            attempt,
            max_attempts: self.cfg.max_attempts,
            is_retrying,
        }
    }

    /// Record and fan out a status transition.
    fn publish(&self, key: &str, attempt: u32, is_retrying: bool) {
        let status = self.status_for(key, attempt, is_retrying);
        self.statuses
            .lock()
            .unwrap()
            .insert(key.to_string(), status.clone());
        self.listeners.notify(&status);
    }

    /// Terminal transition: the task leaves the queue. The final status is
    /// still delivered to listeners but no longer tracked.
    fn finish(&self, key: &str, attempt: u32) {
        self.statuses.lock().unwrap().remove(key);
        self.active.lock().unwrap().remove(key);
        let status = self.status_for(key, attempt, false);
        self.listeners.notify(&status);
    }
}

/// Single-flight, globally serialized, retrying task queue.
/// Cheap to clone; all clones share the same worker and bookkeeping.
#[derive(Clone)]
pub struct TaskQueue {
    shared: Arc<Shared>,
    tx: mpsc::UnboundedSender<QueuedTask>,
}

impl TaskQueue {
    /// Create the queue and spawn its worker. Must be called from within a
    /// tokio runtime.
    pub fn new(cfg: QueueConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            cfg,
            active: Mutex::new(HashSet::new()),
            statuses: Mutex::new(HashMap::new()),
            listeners: Arc::new(RetryListeners::default()),
            generation: AtomicU64::new(0),
        });
        tokio::spawn(worker(Arc::clone(&shared), rx));
        TaskQueue { shared, tx }
    }

    /// Register `action` under `key` and wait for its terminal outcome.
    ///
    /// If `key` already has an active task this is a no-op that resolves
    /// `Ok(())` immediately, without waiting for the existing task
    /// (single-flight per key). Admission and the queue push both happen
    /// before the first suspension point, so concurrent callers cannot
    /// double-admit a key.
    ///
    /// Returns `Err(AppError::RetriesExhausted)` once the action has failed
    /// `max_attempts` times, wrapping the last underlying error, and
    /// `Err(AppError::TaskCancelled)` when [`TaskQueue::clear`] discards the
    /// task before it runs.
    pub async fn enqueue<F, Fut>(&self, key: &str, action: F) -> AppResult<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<()>> + Send + 'static,
    {
        let generation = self.shared.generation.load(Ordering::SeqCst);
        {
            let mut active = self.shared.active.lock().unwrap();
            if !active.insert(key.to_string()) {
                debug!(key, "task already queued, skipping");
                return Ok(());
            }
        }

        let (done_tx, done_rx) = oneshot::channel();
        let task = QueuedTask {
            key: key.to_string(),
            action: Box::new(move || Box::pin(action())),
            generation,
            done: done_tx,
        };

        if self.tx.send(task).is_err() {
            self.shared.active.lock().unwrap().remove(key);
            return Err(AppError::TaskCancelled(key.to_string()));
        }

        match done_rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(AppError::TaskCancelled(key.to_string())),
        }
    }

    /// Point-in-time snapshot of a key's retry progress. `None` once the
    /// task has terminated (or never existed).
    pub fn retry_status(&self, key: &str) -> Option<RetryStatus> {
        self.shared.statuses.lock().unwrap().get(key).cloned()
    }

    /// Subscribe to every status transition of `key`. Delivery is
    /// synchronous and ordered for listeners registered before the
    /// notification point. Dropping the handle unsubscribes.
    pub fn add_retry_listener<F>(&self, key: &str, listener: F) -> RetryListenerHandle
    where
        F: Fn(&RetryStatus) + Send + Sync + 'static,
    {
        let id = self.shared.listeners.subscribe(key, Arc::new(listener));
        RetryListenerHandle::new(
            key.to_string(),
            id,
            Arc::downgrade(&self.shared.listeners),
        )
    }

    /// Abort bookkeeping for all pending and active keys.
    ///
    /// Queued-but-unstarted tasks are discarded (their `enqueue` futures
    /// resolve with `TaskCancelled`) and every tracked key's listeners are
    /// told `is_retrying: false`. Best effort only: an action the worker is
    /// already awaiting runs to completion, it just never retries past the
    /// clear.
    pub fn clear(&self) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);

        let keys: HashSet<String> = {
            let mut active = self.shared.active.lock().unwrap();
            let mut statuses = self.shared.statuses.lock().unwrap();
            let keys = active
                .drain()
                .chain(statuses.drain().map(|(k, _)| k))
                .collect();
            keys
        };

        for key in keys {
            let status = self.shared.status_for(&key, 0, false);
            self.shared.listeners.notify(&status);
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        TaskQueue::new(QueueConfig::default())
    }
}

/// Sole consumer of the FIFO; the only place actions are awaited.
async fn worker(shared: Arc<Shared>, mut rx: mpsc::UnboundedReceiver<QueuedTask>) {
    while let Some(task) = rx.recv().await {
        if task.generation != shared.generation.load(Ordering::SeqCst) {
            debug!(key = %task.key, "discarding task queued before clear");
            // The key may have been re-admitted between the clear and this
            // check; release it so the next enqueue is not a no-op forever.
            shared.active.lock().unwrap().remove(&task.key);
            let _ = task.done.send(Err(AppError::TaskCancelled(task.key.clone())));
            continue;
        }
        let outcome = run_task(&shared, &task).await;
        let _ = task.done.send(outcome);
    }
}

async fn run_task(shared: &Shared, task: &QueuedTask) -> AppResult<()> {
    let max = shared.cfg.max_attempts;
    let mut attempt: u32 = 0;

    loop {
        shared.publish(&task.key, attempt, attempt > 0);

        match (task.action)().await {
            Ok(()) => {
                shared.finish(&task.key, attempt);
                return Ok(());
            }
            Err(err) => {
                attempt += 1;

                if attempt >= max {
                    warn!(key = %task.key, attempts = attempt, error = %err, "task exhausted retries");
                    shared.finish(&task.key, attempt);
                    return Err(AppError::RetriesExhausted {
                        key: task.key.clone(),
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }

                debug!(key = %task.key, attempt, max, error = %err, "task failed, backing off");
                shared.publish(&task.key, attempt, true);
                tokio::time::sleep(backoff_delay(shared.cfg.base_delay, attempt)).await;

                // A clear during the backoff abandons the task.
                if task.generation != shared.generation.load(Ordering::SeqCst) {
                    return Err(AppError::TaskCancelled(task.key.clone()));
                }
            }
        }
    }
}

/// `base * 2^(attempt-1)`, attempt counted from 1 for the first retry.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * 2u32.saturating_pow(attempt.saturating_sub(1))
}
