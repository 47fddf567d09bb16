//! Punch-clock feature store.
//! Thin state container proxying bridge calls through the shared task queue
//! so that initialization and operations serialize and recover on their own.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::bridge::PontoBridge;
use crate::errors::{AppResult, BridgeError};
use crate::models::{Location, Operation};
use crate::queue::TaskQueue;
use crate::refresh::RefreshBus;

pub const TASK_INITIALIZATION: &str = "ponto-initialization";
pub const TASK_LOCALIZACAO: &str = "ponto-localizacao";
pub const TASK_OPERACOES: &str = "ponto-operacoes";
pub const TASK_EXECUCAO: &str = "ponto-execucao";

#[derive(Debug, Default, Clone)]
pub struct PontoState {
    pub initialized: bool,
    pub current_location: Option<String>,
    pub locations: Vec<Location>,
    pub operations: Vec<Operation>,
    pub last_error: Option<BridgeError>,
}

pub struct PontoStore {
    bridge: Arc<dyn PontoBridge>,
    queue: TaskQueue,
    refresh: RefreshBus,
    state: Arc<Mutex<PontoState>>,
}

impl PontoStore {
    pub fn new(bridge: Arc<dyn PontoBridge>, queue: TaskQueue, refresh: RefreshBus) -> Self {
        PontoStore {
            bridge,
            queue,
            refresh,
            state: Arc::new(Mutex::new(PontoState::default())),
        }
    }

    /// Load current location plus the available locations and operations.
    pub async fn initialize(&self) -> AppResult<()> {
        let bridge = Arc::clone(&self.bridge);
        let state = Arc::clone(&self.state);

        let outcome = self
            .queue
            .enqueue(TASK_INITIALIZATION, move || {
                let bridge = Arc::clone(&bridge);
                let state = Arc::clone(&state);
                async move {
                    let current = bridge.current_location().await?;
                    let locations = bridge.available_locations().await?;
                    let operations = bridge.available_operations().await?;

                    let mut s = state.lock().unwrap();
                    s.current_location = Some(current);
                    s.locations = locations;
                    s.operations = operations;
                    s.initialized = true;
                    s.last_error = None;
                    Ok(())
                }
            })
            .await;

        self.record_outcome(outcome)
    }

    /// Execute a punch operation. A successful punch invalidates the current
    /// timeline, so the refresh signal fires from inside the task (only real
    /// successes publish, never the duplicate-enqueue no-op).
    pub async fn execute(&self, operation: Operation) -> AppResult<()> {
        let bridge = Arc::clone(&self.bridge);
        let refresh = self.refresh.clone();

        let outcome = self
            .queue
            .enqueue(TASK_EXECUCAO, move || {
                let bridge = Arc::clone(&bridge);
                let refresh = refresh.clone();
                async move {
                    bridge.execute(operation).await?;
                    info!(operation = operation.describe(), "punch executed");
                    refresh.notify();
                    Ok(())
                }
            })
            .await;

        self.record_outcome(outcome)
    }

    pub async fn select_location(&self, location: Location) -> AppResult<()> {
        let bridge = Arc::clone(&self.bridge);
        let state = Arc::clone(&self.state);

        let outcome = self
            .queue
            .enqueue(TASK_LOCALIZACAO, move || {
                let bridge = Arc::clone(&bridge);
                let state = Arc::clone(&state);
                let location = location.clone();
                async move {
                    bridge.select_location(&location).await?;
                    state.lock().unwrap().current_location = Some(location.name);
                    Ok(())
                }
            })
            .await;

        self.record_outcome(outcome)
    }

    /// Refresh only the operation list (the backend narrows it as the day
    /// progresses).
    pub async fn reload_operations(&self) -> AppResult<()> {
        let bridge = Arc::clone(&self.bridge);
        let state = Arc::clone(&self.state);

        let outcome = self
            .queue
            .enqueue(TASK_OPERACOES, move || {
                let bridge = Arc::clone(&bridge);
                let state = Arc::clone(&state);
                async move {
                    let operations = bridge.available_operations().await?;
                    state.lock().unwrap().operations = operations;
                    Ok(())
                }
            })
            .await;

        self.record_outcome(outcome)
    }

    pub fn state(&self) -> PontoState {
        self.state.lock().unwrap().clone()
    }

    pub fn clear_error(&self) {
        self.state.lock().unwrap().last_error = None;
    }

    /// Keep the last bridge failure visible to the UI layer; other keys'
    /// failures never land here (per-key isolation).
    fn record_outcome(&self, outcome: AppResult<()>) -> AppResult<()> {
        if let Err(ref err) = outcome
            && let Some(bridge_err) = err.as_bridge()
        {
            self.state.lock().unwrap().last_error = Some(bridge_err.clone());
        }
        outcome
    }
}
