use chrono::{DateTime, Local};

use crate::core::calculator::{elapsed, threshold, timeline};
use crate::models::{RawPunchRecord, WorkdaySummary};

pub struct Core;

impl Core {
    /// One-stop derivation: reconstruct the day and compute its metrics.
    pub fn build_workday_summary(records: &[RawPunchRecord], now: DateTime<Local>) -> WorkdaySummary {
        let workday = timeline::reconstruct(records);
        Self::summarize(workday, now)
    }

    /// Metrics over an already-built workday (records form or the bridge's
    /// pre-aggregated snapshot form).
    pub fn summarize(workday: timeline::Workday, now: DateTime<Local>) -> WorkdaySummary {
        let elapsed_minutes = elapsed::elapsed_worked_minutes(&workday, now);
        let extra_break_minutes = threshold::extra_break_minutes(&workday);
        let warning_threshold = threshold::warning_threshold(&workday);

        WorkdaySummary {
            workday,
            elapsed_minutes,
            extra_break_minutes,
            warning_threshold,
        }
    }
}
