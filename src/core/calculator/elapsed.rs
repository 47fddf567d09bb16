use chrono::{DateTime, Local};

use crate::core::calculator::timeline::Workday;

/// A moment where the person either came back to work or left it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Entry,
    Exit,
}

/// Minutes actually worked so far.
///
/// Walks the entry/exit boundaries of the day in order, accumulating the
/// span between each entry and the exit that follows it. An open workday
/// uses `now` as its closing exit; a dangling entry with no exit at all
/// contributes nothing. The result is floored to whole minutes and never
/// negative. A day with no clock-in has not started: zero.
pub fn elapsed_worked_minutes(day: &Workday, now: DateTime<Local>) -> i64 {
    let Some(clock_in) = day.clock_in else {
        return 0;
    };

    let mut boundaries: Vec<(DateTime<Local>, Boundary)> = vec![(clock_in, Boundary::Entry)];

    if let Some(t) = day.lunch_start {
        boundaries.push((t, Boundary::Exit));
    }
    if let Some(t) = day.lunch_end {
        boundaries.push((t, Boundary::Entry));
    }
    for ev in &day.special_events {
        let kind = if ev.kind.is_out() { Boundary::Exit } else { Boundary::Entry };
        boundaries.push((ev.timestamp, kind));
    }
    boundaries.push((day.clock_out.unwrap_or(now), Boundary::Exit));

    boundaries.sort_by_key(|(t, _)| *t);

    let mut total = chrono::TimeDelta::zero();
    let mut open_entry: Option<DateTime<Local>> = None;

    for (t, kind) in boundaries {
        match kind {
            Boundary::Entry => {
                // A second entry while one is open keeps the earlier one.
                if open_entry.is_none() {
                    open_entry = Some(t);
                }
            }
            Boundary::Exit => {
                if let Some(start) = open_entry.take() {
                    total += t - start;
                }
            }
        }
    }

    total.num_minutes().max(0)
}
