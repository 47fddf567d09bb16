//! Team-chat feature store. Status and message calls go through the shared
//! queue so they never overlap the punch-clock traffic during startup.

use std::sync::{Arc, Mutex};

use crate::bridge::{SlackBridge, SlackStatus};
use crate::errors::{AppResult, BridgeError};
use crate::queue::TaskQueue;

pub const TASK_STATUS: &str = "slack-status";
pub const TASK_MESSAGE: &str = "slack-message";

#[derive(Debug, Default, Clone)]
pub struct SlackState {
    pub status: Option<SlackStatus>,
    pub last_error: Option<BridgeError>,
}

pub struct SlackStore {
    bridge: Arc<dyn SlackBridge>,
    queue: TaskQueue,
    state: Arc<Mutex<SlackState>>,
}

impl SlackStore {
    pub fn new(bridge: Arc<dyn SlackBridge>, queue: TaskQueue) -> Self {
        SlackStore {
            bridge,
            queue,
            state: Arc::new(Mutex::new(SlackState::default())),
        }
    }

    pub async fn load_status(&self) -> AppResult<()> {
        let bridge = Arc::clone(&self.bridge);
        let state = Arc::clone(&self.state);

        let outcome = self
            .queue
            .enqueue(TASK_STATUS, move || {
                let bridge = Arc::clone(&bridge);
                let state = Arc::clone(&state);
                async move {
                    let status = bridge.status().await?;
                    let mut s = state.lock().unwrap();
                    s.status = status;
                    s.last_error = None;
                    Ok(())
                }
            })
            .await;

        self.record_outcome(outcome)
    }

    pub async fn set_status(&self, status: SlackStatus) -> AppResult<()> {
        let bridge = Arc::clone(&self.bridge);
        let state = Arc::clone(&self.state);

        let outcome = self
            .queue
            .enqueue(TASK_STATUS, move || {
                let bridge = Arc::clone(&bridge);
                let state = Arc::clone(&state);
                let status = status.clone();
                async move {
                    bridge.set_status(&status).await?;
                    let mut s = state.lock().unwrap();
                    s.status = Some(status);
                    s.last_error = None;
                    Ok(())
                }
            })
            .await;

        self.record_outcome(outcome)
    }

    pub async fn send_message(&self, text: String) -> AppResult<()> {
        let bridge = Arc::clone(&self.bridge);

        let outcome = self
            .queue
            .enqueue(TASK_MESSAGE, move || {
                let bridge = Arc::clone(&bridge);
                let text = text.clone();
                async move { Ok(bridge.send_message(&text).await?) }
            })
            .await;

        self.record_outcome(outcome)
    }

    pub fn state(&self) -> SlackState {
        self.state.lock().unwrap().clone()
    }

    fn record_outcome(&self, outcome: AppResult<()>) -> AppResult<()> {
        if let Err(ref err) = outcome
            && let Some(bridge_err) = err.as_bridge()
        {
            self.state.lock().unwrap().last_error = Some(bridge_err.clone());
        }
        outcome
    }
}
