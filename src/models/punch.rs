use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Raw punch type as delivered by the backend bridge.
///
/// The origin system only knows three codes. Code 0 is ambiguous: it marks
/// both the initial clock-in and the return from any absence. Code 2 is
/// equally ambiguous between the final clock-out and a sporadic exit. The
/// reconstruction pass in `core::calculator::timeline` resolves both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PunchType {
    /// Clock-in or return from an absence (code 0).
    Entry,
    /// Lunch or break start (code 1).
    LunchStart,
    /// Clock-out or sporadic exit (code 2).
    Exit,
}

impl PunchType {
    /// Convert enum → bridge code
    pub fn code(&self) -> u8 {
        match self {
            PunchType::Entry => 0,
            PunchType::LunchStart => 1,
            PunchType::Exit => 2,
        }
    }

    /// Convert bridge code → enum
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PunchType::Entry),
            1 => Some(PunchType::LunchStart),
            2 => Some(PunchType::Exit),
            _ => None,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, PunchType::Entry)
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, PunchType::Exit)
    }
}

impl From<PunchType> for u8 {
    fn from(t: PunchType) -> u8 {
        t.code()
    }
}

impl TryFrom<u8> for PunchType {
    type Error = AppError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        PunchType::from_code(code).ok_or(AppError::InvalidPunchType(code))
    }
}

/// A single timestamped clock event, exactly as the backend reports it.
/// Records arrive unordered and carry no uniqueness guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPunchRecord {
    pub timestamp: DateTime<Local>,
    #[serde(rename = "type")]
    pub kind: PunchType,
    pub location: String,
}
