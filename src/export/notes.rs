use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::export::{Export, ExportError};
use crate::model::{LibrarySnapshot, Note};
use crate::progress::percentage;

/// A note resolved against its book for export: title denormalized,
/// position expressed as a percentage of the book.
#[derive(Debug, Clone, Serialize)]
pub struct NoteRecord {
    pub id: Uuid,
    pub book_title: String,
    pub position: u32,
    pub percentage: u32,
    pub content: String,
    pub quote_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NoteRecord {
    pub fn build(note: &Note, snapshot: &LibrarySnapshot) -> Self {
        let book = snapshot.expect_book(note.book_id);
        Self {
            id: note.id,
            book_title: book.title.clone(),
            position: note.position,
            percentage: percentage(note.position.min(book.total), book),
            content: note.content.clone(),
            quote_text: note.quote_text.clone(),
            created_at: note.created_at,
        }
    }

    pub fn build_all(snapshot: &LibrarySnapshot) -> Vec<Self> {
        snapshot
            .notes()
            .iter()
            .map(|n| Self::build(n, snapshot))
            .collect()
    }
}

impl Export for [NoteRecord] {
    fn to_csv(&self) -> Result<String, ExportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for note in self {
            wtr.serialize(note)?;
        }
        Ok(String::from_utf8(wtr.into_inner()?)?)
    }

    fn to_md(&self) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        use std::io::Write;

        for note in self {
            writeln!(buffer, "### {}", note.book_title)?;
            if let Some(quote) = &note.quote_text {
                writeln!(buffer, "\n> {}", quote)?;
            }
            writeln!(buffer, "\n{}", note.content)?;
            writeln!(buffer, "\n**Position:** {}%", note.percentage)?;
            let formatted_date = note
                .created_at
                .to_rfc3339_opts(SecondsFormat::Secs, true);
            writeln!(buffer, "**Created:** {}", formatted_date)?;
            writeln!(buffer, "\n---\n")?;
        }
        Ok(String::from_utf8(buffer)?)
    }

    fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string(self).map_err(ExportError::JsonToString)
    }
}
