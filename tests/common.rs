//! Shared mock bridges for the store tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use pontolog::bridge::{
    AuthBridge, Credentials, PontoBridge, SlackBridge, SlackStatus, TimelineSource,
};
use pontolog::errors::BridgeError;
use pontolog::models::{Location, Operation, RawPunchRecord};
use pontolog::Workday;

/// Punch-clock bridge with scriptable failures.
#[derive(Default)]
pub struct MockPontoBridge {
    /// Timeline payload handed back on fetch.
    pub timeline: Mutex<Option<TimelineSource>>,
    /// Number of initial `execute` calls that fail before one succeeds.
    pub execute_failures: AtomicU32,
    /// Error used for scripted failures.
    pub failure: Mutex<Option<BridgeError>>,
    pub executed: AtomicU32,
    pub fetches: AtomicU32,
}

impl MockPontoBridge {
    pub fn with_records(records: Vec<RawPunchRecord>) -> Self {
        let bridge = MockPontoBridge::default();
        *bridge.timeline.lock().unwrap() = Some(TimelineSource::Records(records));
        bridge
    }

    pub fn with_snapshot(workday: Workday) -> Self {
        let bridge = MockPontoBridge::default();
        *bridge.timeline.lock().unwrap() = Some(TimelineSource::Snapshot(workday));
        bridge
    }

    pub fn failing_executes(times: u32, error: BridgeError) -> Self {
        let bridge = MockPontoBridge::default();
        bridge.execute_failures.store(times, Ordering::SeqCst);
        *bridge.failure.lock().unwrap() = Some(error);
        bridge
    }

    fn scripted_failure(&self) -> BridgeError {
        self.failure
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| BridgeError::Runtime("scripted failure".to_string()))
    }
}

#[async_trait]
impl PontoBridge for MockPontoBridge {
    async fn timeline_data(&self) -> Result<TimelineSource, BridgeError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.timeline
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| self.scripted_failure())
    }

    async fn execute(&self, _operation: Operation) -> Result<(), BridgeError> {
        self.executed.fetch_add(1, Ordering::SeqCst);
        let remaining = self.execute_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.execute_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(self.scripted_failure());
        }
        Ok(())
    }

    async fn current_location(&self) -> Result<String, BridgeError> {
        Ok("Escritório Central".to_string())
    }

    async fn available_locations(&self) -> Result<Vec<Location>, BridgeError> {
        Ok(vec![
            Location::new("Escritório Central", "1"),
            Location::new("Home Office", "2"),
        ])
    }

    async fn select_location(&self, _location: &Location) -> Result<(), BridgeError> {
        Ok(())
    }

    async fn available_operations(&self) -> Result<Vec<Operation>, BridgeError> {
        Ok(vec![Operation::ClockIn, Operation::Lunch, Operation::ClockOut])
    }
}

#[derive(Default)]
pub struct MockAuthBridge {
    /// When set, login fails with this error.
    pub login_error: Mutex<Option<BridgeError>>,
    pub logins: AtomicU32,
}

#[async_trait]
impl AuthBridge for MockAuthBridge {
    async fn login(&self, _credentials: &Credentials) -> Result<(), BridgeError> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        match self.login_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn verify_credentials(&self) -> Result<bool, BridgeError> {
        Ok(self.login_error.lock().unwrap().is_none())
    }
}

#[derive(Default)]
pub struct MockSlackBridge {
    pub status: Mutex<Option<SlackStatus>>,
    pub messages: Mutex<Vec<String>>,
}

#[async_trait]
impl SlackBridge for MockSlackBridge {
    async fn status(&self) -> Result<Option<SlackStatus>, BridgeError> {
        Ok(self.status.lock().unwrap().clone())
    }

    async fn set_status(&self, status: &SlackStatus) -> Result<(), BridgeError> {
        *self.status.lock().unwrap() = Some(status.clone());
        Ok(())
    }

    async fn send_message(&self, text: &str) -> Result<(), BridgeError> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
