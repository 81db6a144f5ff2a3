use crate::model::{Book, LibrarySnapshot, StatusLog};
use crate::progress::Progress;

/// Progress made by `event` since its nearest non-paused predecessor.
///
/// Paused entries (position 0) carry no progress information and are
/// skipped while walking back. With no usable predecessor the event's full
/// position counts as progress; going backward (or staying put) counts as
/// zero, never negative. Pure function of `(event, book, snapshot)`.
pub fn diff(event: &StatusLog, book: &Book, snapshot: &LibrarySnapshot) -> Progress {
    let prev_position = snapshot
        .history_before(event)
        .find(|e| e.position > 0)
        .map(|e| e.position)
        .unwrap_or(0);

    Progress::from_raw(event.position.saturating_sub(prev_position), book)
}
