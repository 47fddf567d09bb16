use chrono::{DateTime, Local, TimeDelta};

use crate::core::calculator::timeline::Workday;

/// Contractual workday length before the end-of-day warning fires.
const WORKDAY_HOURS: i64 = 9;

/// Lunch minutes included in the contractual workday; anything beyond
/// pushes the warning threshold out.
const STANDARD_LUNCH_MINUTES: i64 = 60;

/// Minutes of lunch taken beyond the standard hour. Zero when the lunch
/// interval is still open or never happened.
pub fn extra_break_minutes(day: &Workday) -> i64 {
    day.lunch_minutes()
        .map(|m| (m - STANDARD_LUNCH_MINUTES).max(0))
        .unwrap_or(0)
}

/// Sum of the durations of all closed sporadic out/in pairs. Unpaired
/// departures have no closing timestamp and contribute nothing.
fn paired_sporadic_minutes(day: &Workday) -> i64 {
    let mut total = 0;
    let events = &day.special_events;
    for (i, ev) in events.iter().enumerate() {
        if ev.kind.is_out()
            && let Some(next) = events.get(i + 1)
            && next.kind.is_in()
        {
            total += (next.timestamp - ev.timestamp).num_minutes();
        }
    }
    total
}

/// Instant past which the person risks exceeding the allowed workday:
/// clock-in + 9h, pushed out by lunch overage and by every closed sporadic
/// excursion. Unknown (`None`) until the day has started.
pub fn warning_threshold(day: &Workday) -> Option<DateTime<Local>> {
    let clock_in = day.clock_in?;

    let shift = TimeDelta::hours(WORKDAY_HOURS)
        + TimeDelta::minutes(extra_break_minutes(day))
        + TimeDelta::minutes(paired_sporadic_minutes(day));

    Some(clock_in + shift)
}
