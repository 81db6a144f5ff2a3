use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::LibrarySnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReadingDays {
    pub total: usize,
    pub continuous: usize,
    pub continuous_max: usize,
}

/// Reading-day totals and streaks over the snapshot's event dates.
///
/// A streak is a run of consecutive calendar days each having at least one
/// event. `continuous` is the streak ending at the most recent recorded
/// date, zeroed when that date lies more than one day before `as_of`
/// (the streak is already broken as of the evaluation date).
pub fn reading_days(snapshot: &LibrarySnapshot, as_of: NaiveDate) -> ReadingDays {
    let dates: BTreeSet<NaiveDate> = snapshot
        .events()
        .iter()
        .map(|e| e.created_at.date_naive())
        .collect();

    let mut streak = 0usize;
    let mut continuous_max = 0usize;
    let mut prev: Option<NaiveDate> = None;

    for &date in &dates {
        streak = match prev {
            Some(p) if (date - p).num_days() == 1 => streak + 1,
            _ => 1,
        };
        continuous_max = continuous_max.max(streak);
        prev = Some(date);
    }

    let continuous = match prev {
        Some(last) if (as_of - last).num_days() <= 1 => streak,
        _ => 0,
    };

    ReadingDays {
        total: dates.len(),
        continuous,
        continuous_max,
    }
}
