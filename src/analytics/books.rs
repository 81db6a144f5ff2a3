use serde::Serialize;

use crate::model::LibrarySnapshot;
use crate::progress::ReadingState;
use crate::window::DateWindow;

/// How the date window applies to per-state book counts.
///
/// The historical API had an acknowledged discrepancy: set-aside books and
/// the `all` total ignored the caller's date range, because books without
/// any progress log were unioned into the result unconditionally.
/// `IncludeIdle` reproduces that behavior; `WindowedOnly` counts only books
/// actually touched by an event inside the window. Which one is "correct"
/// is a product decision, so both stay available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookCountScope {
    WindowedOnly,
    IncludeIdle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BookCounts {
    pub to_be_read: usize,
    pub reading: usize,
    pub read: usize,
    pub all: usize,
}

/// Distinct-book counts per reading state.
///
/// A book is classified by its chronologically latest event over the FULL
/// history, not just the window; the window only decides which books are
/// counted at all. Classification is one pass over the snapshot's per-book
/// index, never a rescan per book.
pub fn number_of_books(
    snapshot: &LibrarySnapshot,
    window: &DateWindow,
    scope: BookCountScope,
) -> BookCounts {
    let mut counts = BookCounts::default();

    for book in snapshot.books() {
        let latest = snapshot.latest(book.id);
        let touched_in_window = snapshot
            .history(book.id)
            .any(|e| window.contains(e.created_at.date_naive()));

        let counted = match scope {
            BookCountScope::WindowedOnly => touched_in_window,
            BookCountScope::IncludeIdle => touched_in_window || latest.is_none(),
        };
        if !counted {
            continue;
        }

        let state = match latest {
            Some(event) => ReadingState::classify(event.position, book),
            // Never-opened books only surface under IncludeIdle.
            None => ReadingState::ToBeRead,
        };
        match state {
            ReadingState::ToBeRead => counts.to_be_read += 1,
            ReadingState::Reading => counts.reading += 1,
            ReadingState::Read => counts.read += 1,
        }
        counts.all += 1;
    }

    counts
}
