use chrono::{DateTime, Local};

use crate::models::punch::{PunchType, RawPunchRecord};
use crate::models::special::SpecialEvent;

/// Canonical narrative of one workday, derived from the raw punch records.
///
/// Every field is recomputed from scratch on each call to [`reconstruct`];
/// nothing here is ever patched in place.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Workday {
    pub clock_in: Option<DateTime<Local>>,
    pub lunch_start: Option<DateTime<Local>>,
    pub lunch_end: Option<DateTime<Local>>,
    pub clock_out: Option<DateTime<Local>>,
    pub special_events: Vec<SpecialEvent>,
    /// The input records, sorted chronologically. Kept for downstream
    /// consumers and debugging.
    pub records: Vec<RawPunchRecord>,
}

impl Workday {
    pub fn has_started(&self) -> bool {
        self.clock_in.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.clock_out.is_some()
    }

    /// Lunch interval length in minutes, if both ends are known.
    pub fn lunch_minutes(&self) -> Option<i64> {
        match (self.lunch_start, self.lunch_end) {
            (Some(start), Some(end)) => Some((end - start).num_minutes()),
            _ => None,
        }
    }
}

/// Rebuild the workday narrative from an unordered batch of punch records.
///
/// The three raw codes are ambiguous: an Entry is either the clock-in or a
/// return from an absence, and an Exit is either the clock-out or a sporadic
/// departure. Disambiguation rules, in order:
/// - the first Entry is the clock-in;
/// - the first Entry strictly after the first LunchStart closes the lunch;
/// - each Exit pairs with the first later Entry not yet consumed, forming a
///   sporadic out/in pair;
/// - only the chronologically last Exit may become the clock-out; earlier
///   unmatched Exits stay as unpaired sporadic departures.
///
/// Pure and total: empty input yields an empty `Workday`, inconsistent input
/// degrades to unpaired events, nothing panics.
pub fn reconstruct(records: &[RawPunchRecord]) -> Workday {
    if records.is_empty() {
        return Workday::default();
    }

    // -----------------------------
    // Sort records chronologically (stable: ties keep input order)
    // -----------------------------
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.timestamp);

    let entries: Vec<&RawPunchRecord> = sorted.iter().filter(|r| r.kind.is_entry()).collect();
    let lunch_outs: Vec<&RawPunchRecord> =
        sorted.iter().filter(|r| r.kind == PunchType::LunchStart).collect();
    let exits: Vec<&RawPunchRecord> = sorted.iter().filter(|r| r.kind.is_exit()).collect();

    let mut day = Workday {
        clock_in: entries.first().map(|r| r.timestamp),
        ..Workday::default()
    };

    // -----------------------------
    // Lunch pairing: first lunch-out, closed by the first later entry
    // -----------------------------
    if let Some(lunch_out) = lunch_outs.first() {
        day.lunch_start = Some(lunch_out.timestamp);
        day.lunch_end = entries
            .iter()
            .find(|e| e.timestamp > lunch_out.timestamp)
            .map(|e| e.timestamp);
    }

    // Cursor marks the last re-entry already consumed; None means "before
    // all records".
    let mut cursor: Option<DateTime<Local>> = day.lunch_end.or(day.clock_in);

    // -----------------------------
    // Exit walk: pair sporadic out/in, last exit wins as clock-out
    // -----------------------------
    for (i, exit) in exits.iter().enumerate() {
        let next_entry = entries.iter().find(|e| e.timestamp > exit.timestamp);

        match next_entry {
            Some(entry) if cursor.is_none_or(|c| entry.timestamp > c) => {
                day.special_events.push(SpecialEvent::sporadic_out(
                    exit.timestamp,
                    Some(exit.location.clone()),
                ));
                day.special_events.push(SpecialEvent::sporadic_in(
                    entry.timestamp,
                    Some(entry.location.clone()),
                ));
                cursor = Some(entry.timestamp);
            }
            _ if i == exits.len() - 1 => {
                day.clock_out = Some(exit.timestamp);
            }
            _ => {
                // No usable re-entry and not the final exit: the departure
                // stays unpaired.
                day.special_events.push(SpecialEvent::sporadic_out(
                    exit.timestamp,
                    Some(exit.location.clone()),
                ));
            }
        }
    }

    // Largely ordered by construction already; re-sort to be safe.
    day.special_events.sort_by_key(|e| e.timestamp);

    day.records = sorted;
    day
}
