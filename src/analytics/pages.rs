use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::LibrarySnapshot;
use crate::progress::diff;
use crate::window::DateWindow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PagesRead {
    pub total: u64,
    pub avg_per_day: u64,
}

/// Cumulative pages read, plus the per-day average over the window.
///
/// `total` sums the page diff of every event in the snapshot; the average
/// numerator is restricted to events inside the window so it matches the
/// day-count denominator. Averages truncate.
pub fn pages_read(snapshot: &LibrarySnapshot, window: &DateWindow) -> PagesRead {
    let mut total = 0u64;
    let mut in_window = 0u64;

    for event in snapshot.events() {
        let book = snapshot.expect_book(event.book_id);
        let page = diff(event, book, snapshot).page as u64;
        total += page;
        if window.contains(event.created_at.date_naive()) {
            in_window += page;
        }
    }

    PagesRead {
        total,
        avg_per_day: in_window / window.days_inclusive() as u64,
    }
}

/// Page totals grouped by calendar day, ascending by date. Callers that
/// present newest-first should iterate the map in reverse.
pub fn pages_daily(snapshot: &LibrarySnapshot) -> BTreeMap<NaiveDate, u64> {
    let mut daily = BTreeMap::new();
    for event in snapshot.events() {
        let book = snapshot.expect_book(event.book_id);
        let page = diff(event, book, snapshot).page as u64;
        *daily.entry(event.created_at.date_naive()).or_insert(0) += page;
    }
    daily
}
