use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// An excursion outside the entry/lunch/exit skeleton of the workday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecialEventKind {
    SporadicOut,
    SporadicIn,
}

impl SpecialEventKind {
    pub fn is_out(&self) -> bool {
        matches!(self, SpecialEventKind::SporadicOut)
    }

    pub fn is_in(&self) -> bool {
        matches!(self, SpecialEventKind::SporadicIn)
    }
}

/// Produced only by timeline reconstruction; ordered ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialEvent {
    pub timestamp: DateTime<Local>,
    pub kind: SpecialEventKind,
    pub description: Option<String>,
}

impl SpecialEvent {
    pub fn sporadic_out(timestamp: DateTime<Local>, description: Option<String>) -> Self {
        SpecialEvent {
            timestamp,
            kind: SpecialEventKind::SporadicOut,
            description,
        }
    }

    pub fn sporadic_in(timestamp: DateTime<Local>, description: Option<String>) -> Self {
        SpecialEvent {
            timestamp,
            kind: SpecialEventKind::SporadicIn,
            description,
        }
    }
}
