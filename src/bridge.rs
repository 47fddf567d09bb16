//! Backend bridge contracts.
//! The desktop shell owns the actual RPC plumbing; the core only sees these
//! traits and the closed [`BridgeError`] taxonomy they produce.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::calculator::timeline::Workday;
use crate::errors::BridgeError;
use crate::models::{Location, Operation, RawPunchRecord};

/// The two shapes a timeline fetch can come back in.
///
/// `Records` requires a reconstruction pass; `Snapshot` is pre-aggregated by
/// the backend and is used as-is (the caller skips reconstruction, see
/// `store::workday`).
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineSource {
    Records(Vec<RawPunchRecord>),
    Snapshot(Workday),
}

/// Punch-clock RPC surface.
#[async_trait]
pub trait PontoBridge: Send + Sync {
    async fn timeline_data(&self) -> Result<TimelineSource, BridgeError>;
    async fn execute(&self, operation: Operation) -> Result<(), BridgeError>;
    async fn current_location(&self) -> Result<String, BridgeError>;
    async fn available_locations(&self) -> Result<Vec<Location>, BridgeError>;
    async fn select_location(&self, location: &Location) -> Result<(), BridgeError>;
    async fn available_operations(&self) -> Result<Vec<Operation>, BridgeError>;
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authentication RPC surface.
#[async_trait]
pub trait AuthBridge: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<(), BridgeError>;
    async fn verify_credentials(&self) -> Result<bool, BridgeError>;
}

/// Team-chat presence, as shown next to the user's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackStatus {
    pub emoji: String,
    pub text: String,
}

/// Team-chat RPC surface.
#[async_trait]
pub trait SlackBridge: Send + Sync {
    async fn status(&self) -> Result<Option<SlackStatus>, BridgeError>;
    async fn set_status(&self, status: &SlackStatus) -> Result<(), BridgeError>;
    async fn send_message(&self, text: &str) -> Result<(), BridgeError>;
}
