use serde::{Deserialize, Serialize};

use crate::model::{Book, BookFormat, LibrarySnapshot, StatusLog};

/// A raw position or delta expressed in the three units the API reports:
/// the raw value, a whole-number percentage of the book, and pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub value: u32,
    pub percentage: u32,
    pub page: u32,
}

impl Progress {
    pub fn from_raw(raw: u32, book: &Book) -> Self {
        Self {
            value: raw,
            percentage: percentage(raw, book),
            page: page_equivalent(raw, book),
        }
    }
}

/// Converts a raw position/delta into pages.
///
/// Location-based books scale the location count into the physical page
/// count, rounding up so nonzero progress never reports zero pages.
pub fn page_equivalent(raw: u32, book: &Book) -> u32 {
    match book.format {
        BookFormat::Paged => raw,
        BookFormat::LocationBased => {
            let total_page = book
                .total_page
                .expect("location-based book without total_page") as u64;
            let total = book.total as u64;
            ((total_page * raw as u64 + total - 1) / total) as u32
        }
    }
}

/// Whole-number percentage of the book, truncated.
pub fn percentage(raw: u32, book: &Book) -> u32 {
    (100 * raw as u64 / book.total as u64) as u32
}

/// The position to display for `event`.
///
/// A paused entry (position 0) deliberately loses the reader's place, so
/// the display falls back to the most recent older entry that still has
/// one; 0 if the book was never opened before the pause.
pub fn effective_position(event: &StatusLog, snapshot: &LibrarySnapshot) -> u32 {
    if event.position > 0 {
        return event.position;
    }
    snapshot
        .history_before(event)
        .find(|e| e.position > 0)
        .map(|e| e.position)
        .unwrap_or(0)
}
