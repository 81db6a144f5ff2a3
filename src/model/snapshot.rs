use std::collections::HashMap;

use uuid::Uuid;

use crate::model::{Book, Note, StatusLog};

/// Immutable in-memory view of one user's library: books, the full
/// progress-event history and notes, fetched once by the caller.
///
/// The per-book history index is built a single time here so that state
/// and diff lookups never rescan the whole event collection.
#[derive(Debug, Clone, Default)]
pub struct LibrarySnapshot {
    books: Vec<Book>,
    events: Vec<StatusLog>,
    notes: Vec<Note>,
    book_index: HashMap<Uuid, usize>,
    by_book: HashMap<Uuid, Vec<usize>>,
}

impl LibrarySnapshot {
    pub fn new(books: Vec<Book>, mut events: Vec<StatusLog>, notes: Vec<Note>) -> Self {
        events.sort_by_key(|e| e.sort_key());

        let book_index = books
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id, i))
            .collect::<HashMap<_, _>>();

        let mut by_book: HashMap<Uuid, Vec<usize>> = HashMap::new();
        for (i, event) in events.iter().enumerate() {
            by_book.entry(event.book_id).or_default().push(i);
        }

        Self {
            books,
            events,
            notes,
            book_index,
            by_book,
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// All events, ascending by chronological key.
    pub fn events(&self) -> &[StatusLog] {
        &self.events
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn book(&self, id: Uuid) -> Option<&Book> {
        self.book_index.get(&id).map(|&i| &self.books[i])
    }

    /// Panicking lookup for computation paths: an event referencing a book
    /// missing from the snapshot means the caller handed over an invalid
    /// snapshot, which is not recoverable here.
    pub fn expect_book(&self, id: Uuid) -> &Book {
        self.book(id)
            .unwrap_or_else(|| panic!("snapshot is missing book {id}"))
    }

    /// A book's events, newest-first.
    pub fn history(&self, book_id: Uuid) -> impl Iterator<Item = &StatusLog> {
        self.by_book
            .get(&book_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .rev()
            .map(move |&i| &self.events[i])
    }

    /// Events of the same book strictly older than `event`, newest-first.
    pub fn history_before<'a>(
        &'a self,
        event: &'a StatusLog,
    ) -> impl Iterator<Item = &'a StatusLog> {
        let key = event.sort_key();
        self.history(event.book_id)
            .skip_while(move |e| e.sort_key() >= key)
    }

    /// A book's chronologically latest event, over the full history.
    pub fn latest(&self, book_id: Uuid) -> Option<&StatusLog> {
        self.history(book_id).next()
    }
}
