//! Auth feature store. Serializes login and credential checks through the
//! shared queue under its own keys.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::bridge::{AuthBridge, Credentials};
use crate::errors::{AppResult, BridgeError};
use crate::queue::TaskQueue;

pub const TASK_LOGIN: &str = "auth-login";
pub const TASK_VERIFY: &str = "auth-verify";

#[derive(Debug, Default, Clone)]
pub struct AuthState {
    pub authenticated: bool,
    pub last_error: Option<BridgeError>,
}

pub struct AuthStore {
    bridge: Arc<dyn AuthBridge>,
    queue: TaskQueue,
    state: Arc<Mutex<AuthState>>,
}

impl AuthStore {
    pub fn new(bridge: Arc<dyn AuthBridge>, queue: TaskQueue) -> Self {
        AuthStore {
            bridge,
            queue,
            state: Arc::new(Mutex::new(AuthState::default())),
        }
    }

    pub async fn login(&self, credentials: Credentials) -> AppResult<()> {
        let bridge = Arc::clone(&self.bridge);
        let state = Arc::clone(&self.state);

        let outcome = self
            .queue
            .enqueue(TASK_LOGIN, move || {
                let bridge = Arc::clone(&bridge);
                let state = Arc::clone(&state);
                let credentials = credentials.clone();
                async move {
                    bridge.login(&credentials).await?;
                    info!(username = %credentials.username, "login succeeded");
                    let mut s = state.lock().unwrap();
                    s.authenticated = true;
                    s.last_error = None;
                    Ok(())
                }
            })
            .await;

        self.record_outcome(outcome)
    }

    /// Check stored credentials without re-prompting the user.
    pub async fn verify(&self) -> AppResult<()> {
        let bridge = Arc::clone(&self.bridge);
        let state = Arc::clone(&self.state);

        let outcome = self
            .queue
            .enqueue(TASK_VERIFY, move || {
                let bridge = Arc::clone(&bridge);
                let state = Arc::clone(&state);
                async move {
                    let valid = bridge.verify_credentials().await?;
                    let mut s = state.lock().unwrap();
                    s.authenticated = valid;
                    s.last_error = None;
                    Ok(())
                }
            })
            .await;

        self.record_outcome(outcome)
    }

    pub fn state(&self) -> AuthState {
        self.state.lock().unwrap().clone()
    }

    fn record_outcome(&self, outcome: AppResult<()>) -> AppResult<()> {
        if let Err(ref err) = outcome
            && let Some(bridge_err) = err.as_bridge()
        {
            let mut s = self.state.lock().unwrap();
            s.authenticated = false;
            s.last_error = Some(bridge_err.clone());
        }
        outcome
    }
}
