//! Process-wide refresh signal.
//! A payload-free broadcast meaning "re-fetch and recompute now". Punch
//! operations publish it after success; the workday store refetches on
//! receipt.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct RefreshBus {
    tx: broadcast::Sender<()>,
}

impl RefreshBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        RefreshBus { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the signal. Having no subscribers is not an error.
    pub fn notify(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for RefreshBus {
    fn default() -> Self {
        RefreshBus::new()
    }
}
