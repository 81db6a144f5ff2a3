use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One timestamped "update my progress" record for a book.
///
/// `position == 0` is the paused sentinel ("set aside"), not "at the very
/// start". Entries are immutable once created; the analytics engine only
/// ever reads the full historical sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusLog {
    pub id: Uuid,
    pub book_id: Uuid,
    pub position: u32,
    pub created_at: DateTime<Utc>,
}

impl StatusLog {
    pub fn new(book_id: Uuid, position: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_id,
            position,
            created_at,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.position == 0
    }

    /// Chronological key. Timestamp ties break on the id so the ordering
    /// stays total and consistent across calls.
    pub fn sort_key(&self) -> (DateTime<Utc>, Uuid) {
        (self.created_at, self.id)
    }
}
