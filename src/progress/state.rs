use serde::{Deserialize, Serialize};

use crate::model::Book;

/// Reading state derived from a single progress position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingState {
    ToBeRead,
    Reading,
    Read,
}

impl ReadingState {
    /// Total partition of `position`: the paused sentinel (0) means set
    /// aside, anything at or past the end of the book means finished.
    pub fn classify(position: u32, book: &Book) -> Self {
        if position == 0 {
            ReadingState::ToBeRead
        } else if position >= book.total {
            ReadingState::Read
        } else {
            ReadingState::Reading
        }
    }
}
