use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::model::{Book, LibrarySnapshot, StatusLog};
use crate::progress::{diff, effective_position, Progress, ReadingState};

#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub authors: Vec<String>,
    pub total: u32,
    pub total_page: Option<u32>,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            authors: book.authors.clone(),
            total: book.total,
            total_page: book.total_page,
        }
    }
}

/// One progress event resolved into the shape the API layer serves:
/// state classification, the diff against the previous meaningful record,
/// and the displayed position (carry-forward for paused entries).
#[derive(Debug, Clone, Serialize)]
pub struct ProgressRecord {
    pub id: Uuid,
    pub state: ReadingState,
    pub diff: Progress,
    pub position: Progress,
    pub created_at: DateTime<Utc>,
    pub book: BookSummary,
}

impl ProgressRecord {
    pub fn build(event: &StatusLog, snapshot: &LibrarySnapshot) -> Self {
        let book = snapshot.expect_book(event.book_id);
        Self {
            id: event.id,
            state: ReadingState::classify(event.position, book),
            diff: diff(event, book, snapshot),
            position: Progress::from_raw(effective_position(event, snapshot), book),
            created_at: event.created_at,
            book: BookSummary::from(book),
        }
    }

    /// Every event in the snapshot resolved, ascending chronologically.
    pub fn build_all(snapshot: &LibrarySnapshot) -> Vec<Self> {
        snapshot
            .events()
            .iter()
            .map(|e| Self::build(e, snapshot))
            .collect()
    }
}
