use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-text note and/or quoted excerpt attached to a book. Notes are a
/// sibling entity: they never enter progress or analytics computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub book_id: Uuid,
    /// Page or location the note refers to, used for ordering within a book.
    pub position: u32,
    pub content: String,
    pub quote_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(
        book_id: Uuid,
        position: u32,
        content: String,
        quote_text: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_id,
            position,
            content,
            quote_text,
            created_at,
        }
    }
}
