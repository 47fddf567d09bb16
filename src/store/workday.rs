//! Workday state container.
//! Fetches timeline data through the bridge, reconstructs it when it arrives
//! as raw records, and refetches whenever the refresh bus fires. Each fetch
//! replaces the previous summary wholesale.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::bridge::{PontoBridge, TimelineSource};
use crate::core::logic::Core;
use crate::errors::{AppResult, BridgeError};
use crate::models::WorkdaySummary;
use crate::refresh::RefreshBus;

#[derive(Debug, Default, Clone)]
pub struct WorkdayState {
    pub summary: WorkdaySummary,
    pub last_updated: Option<DateTime<Local>>,
    pub last_error: Option<BridgeError>,
}

pub struct WorkdayStore {
    bridge: Arc<dyn PontoBridge>,
    refresh: RefreshBus,
    state: Mutex<WorkdayState>,
}

impl WorkdayStore {
    pub fn new(bridge: Arc<dyn PontoBridge>, refresh: RefreshBus) -> Self {
        WorkdayStore {
            bridge,
            refresh,
            state: Mutex::new(WorkdayState::default()),
        }
    }

    /// Fetch and recompute the workday summary.
    ///
    /// Raw records go through reconstruction; a pre-aggregated snapshot from
    /// the backend skips it entirely and only gets the derived metrics.
    pub async fn refresh(&self) -> AppResult<WorkdaySummary> {
        let now = Local::now();

        match self.bridge.timeline_data().await {
            Ok(TimelineSource::Records(records)) => {
                debug!(count = records.len(), "reconstructing timeline from raw records");
                Ok(self.store_summary(Core::build_workday_summary(&records, now), now))
            }
            Ok(TimelineSource::Snapshot(workday)) => {
                debug!("backend returned pre-aggregated timeline");
                Ok(self.store_summary(Core::summarize(workday, now), now))
            }
            Err(err) => {
                self.state.lock().unwrap().last_error = Some(err.clone());
                Err(err.into())
            }
        }
    }

    fn store_summary(&self, summary: WorkdaySummary, now: DateTime<Local>) -> WorkdaySummary {
        let mut state = self.state.lock().unwrap();
        state.summary = summary.clone();
        state.last_updated = Some(now);
        state.last_error = None;
        summary
    }

    pub fn state(&self) -> WorkdayState {
        self.state.lock().unwrap().clone()
    }

    pub fn summary(&self) -> WorkdaySummary {
        self.state.lock().unwrap().summary.clone()
    }

    /// Refetch on every refresh signal until the bus closes.
    /// Lagged receivers just collapse the missed signals into one refetch.
    pub fn spawn_refresh_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let mut rx = self.refresh.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(()) => {
                        if let Err(err) = store.refresh().await {
                            warn!(error = %err, "refresh-triggered timeline fetch failed");
                        }
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
