//! pontolog library root.
//! Workday timeline reconstruction and retryable task coordination for the
//! desktop ponto companion. The shell application owns UI and RPC plumbing;
//! this crate owns the day narrative, the derived metrics, and the
//! single-flight retry queue the feature stores share.

pub mod bridge;
pub mod core;
pub mod errors;
pub mod models;
pub mod queue;
pub mod refresh;
pub mod store;
pub mod utils;

pub use crate::bridge::{
    AuthBridge, Credentials, PontoBridge, SlackBridge, SlackStatus, TimelineSource,
};
pub use crate::core::calculator::elapsed::elapsed_worked_minutes;
pub use crate::core::calculator::threshold::{extra_break_minutes, warning_threshold};
pub use crate::core::calculator::timeline::{Workday, reconstruct};
pub use crate::core::logic::Core;
pub use crate::errors::{AppError, AppResult, BridgeError};
pub use crate::models::{
    Location, Operation, PunchType, RawPunchRecord, SpecialEvent, SpecialEventKind, WorkdaySummary,
};
pub use crate::queue::{QueueConfig, RetryListenerHandle, RetryStatus, TaskQueue};
pub use crate::refresh::RefreshBus;
