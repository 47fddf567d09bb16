use chrono::{DateTime, Local};

use crate::core::calculator::timeline::Workday;

/// Snapshot of a workday with its derived metrics, recomputed in full on
/// every fetch and superseded wholesale by the next one.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WorkdaySummary {
    pub workday: Workday,
    pub elapsed_minutes: i64,
    pub extra_break_minutes: i64,
    pub warning_threshold: Option<DateTime<Local>>,
}

impl WorkdaySummary {
    /// Elapsed worked time as HH:MM for display.
    pub fn elapsed_hhmm(&self) -> String {
        crate::utils::format_minutes(self.elapsed_minutes)
    }
}
