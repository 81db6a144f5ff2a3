pub mod guard;

pub use guard::*;

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use uuid::Uuid;

use crate::model::{
    normalize_authors, Book, BookFormat, LibrarySnapshot, ModelError, Note, StatusLog,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("book not found: {0}")]
    BookNotFound(Uuid),
    #[error("position {position} is past the end of the book (total {total})")]
    PositionOutOfRange { position: u32, total: u32 },
    #[error("progress log references missing book: {0}")]
    DanglingEvent(Uuid),
}

/// Owner-scoped SQLite persistence for the reading log.
///
/// The write boundary lives here: entity invariants are enforced once, on
/// the way in, so the pure engine can assume them. Reads materialize a
/// [`LibrarySnapshot`] in one pass for the engine to consume.
pub struct ReadingStore {
    conn: Connection,
}

impl ReadingStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS book (
                id TEXT PRIMARY KEY,
                owner TEXT NOT NULL,
                title TEXT NOT NULL,
                format INTEGER NOT NULL,
                total INTEGER NOT NULL,
                total_page INTEGER,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS author (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS book_author (
                book_id TEXT NOT NULL REFERENCES book(id),
                author_id TEXT NOT NULL REFERENCES author(id),
                ord INTEGER NOT NULL,
                PRIMARY KEY (book_id, author_id)
            );
            CREATE TABLE IF NOT EXISTS status_log (
                id TEXT PRIMARY KEY,
                owner TEXT NOT NULL,
                book_id TEXT NOT NULL REFERENCES book(id),
                position INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS note (
                id TEXT PRIMARY KEY,
                owner TEXT NOT NULL,
                book_id TEXT NOT NULL REFERENCES book(id),
                position INTEGER NOT NULL,
                content TEXT NOT NULL,
                quote_text TEXT,
                created_at TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn add_book(
        &self,
        owner: &str,
        title: &str,
        authors: Vec<String>,
        format: BookFormat,
        total: u32,
        total_page: Option<u32>,
        created_at: DateTime<Utc>,
    ) -> Result<Book, StoreError> {
        let book = Book::new(
            title.to_string(),
            authors,
            format,
            total,
            total_page,
            created_at,
        )?;
        self.conn.execute(
            "INSERT INTO book (id, owner, title, format, total, total_page, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                book.id.to_string(),
                owner,
                book.title,
                format_to_int(book.format),
                book.total,
                book.total_page,
                book.created_at.to_rfc3339(),
            ],
        )?;
        self.set_authors(book.id, &book.authors)?;
        Ok(book)
    }

    /// Replaces a book's ordered author list, then drops authors no book
    /// references anymore.
    pub fn update_book_authors(
        &self,
        book_id: Uuid,
        authors: Vec<String>,
    ) -> Result<Vec<String>, StoreError> {
        self.conn
            .query_row(
                "SELECT 1 FROM book WHERE id = ?1",
                [book_id.to_string()],
                |_| Ok(()),
            )
            .optional()?
            .ok_or(StoreError::BookNotFound(book_id))?;

        let names = normalize_authors(authors);
        self.set_authors(book_id, &names)?;
        Ok(names)
    }

    fn set_authors(&self, book_id: Uuid, names: &[String]) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM book_author WHERE book_id = ?1",
            [book_id.to_string()],
        )?;
        for (i, name) in names.iter().enumerate() {
            let author_id = self.get_or_create_author(name)?;
            self.conn.execute(
                "INSERT INTO book_author (book_id, author_id, ord) VALUES (?1, ?2, ?3)",
                params![book_id.to_string(), author_id, i as i64],
            )?;
        }

        let orphaned = self.conn.execute(
            "DELETE FROM author WHERE id NOT IN (SELECT author_id FROM book_author)",
            [],
        )?;
        if orphaned > 0 {
            log::debug!("removed {orphaned} orphaned authors");
        }
        Ok(())
    }

    fn get_or_create_author(&self, name: &str) -> Result<String, StoreError> {
        let mut stmt = self.conn.prepare("SELECT id FROM author WHERE name = ?1")?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(row.get(0)?);
        }
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO author (id, name) VALUES (?1, ?2)",
            params![id, name],
        )?;
        Ok(id)
    }

    /// Appends a progress entry. Positions past the end of the book are
    /// rejected here, at the write boundary; repeating the previous
    /// position is allowed and simply reads as zero progress.
    pub fn log_progress(
        &self,
        owner: &str,
        book_id: Uuid,
        position: u32,
        created_at: DateTime<Utc>,
    ) -> Result<StatusLog, StoreError> {
        let total: u32 = self
            .conn
            .query_row(
                "SELECT total FROM book WHERE id = ?1 AND owner = ?2",
                params![book_id.to_string(), owner],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(StoreError::BookNotFound(book_id))?;
        if position > total {
            return Err(StoreError::PositionOutOfRange { position, total });
        }

        let entry = StatusLog::new(book_id, position, created_at);
        self.conn.execute(
            "INSERT INTO status_log (id, owner, book_id, position, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.id.to_string(),
                owner,
                entry.book_id.to_string(),
                entry.position,
                entry.created_at.to_rfc3339(),
            ],
        )?;
        Ok(entry)
    }

    pub fn add_note(
        &self,
        owner: &str,
        book_id: Uuid,
        position: u32,
        content: &str,
        quote_text: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<Note, StoreError> {
        self.conn
            .query_row(
                "SELECT 1 FROM book WHERE id = ?1 AND owner = ?2",
                params![book_id.to_string(), owner],
                |_| Ok(()),
            )
            .optional()?
            .ok_or(StoreError::BookNotFound(book_id))?;

        let note = Note::new(
            book_id,
            position,
            content.to_string(),
            quote_text.map(|s| s.to_string()),
            created_at,
        );
        self.conn.execute(
            "INSERT INTO note (id, owner, book_id, position, content, quote_text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                note.id.to_string(),
                owner,
                note.book_id.to_string(),
                note.position,
                note.content,
                note.quote_text,
                note.created_at.to_rfc3339(),
            ],
        )?;
        Ok(note)
    }

    /// Loads everything the engine needs for one owner in a single pass.
    /// An event pointing at a book outside the owner's set means the data
    /// is corrupt; that is surfaced, not skipped.
    pub fn snapshot(&self, owner: &str) -> Result<LibrarySnapshot, StoreError> {
        let books = self.load_books(owner)?;
        let events = self.load_events(owner)?;
        let notes = self.load_notes(owner)?;

        let known: std::collections::HashSet<Uuid> = books.iter().map(|b| b.id).collect();
        for event in &events {
            if !known.contains(&event.book_id) {
                log::warn!(
                    "snapshot for {owner} has event {} pointing at unknown book {}",
                    event.id,
                    event.book_id
                );
                return Err(StoreError::DanglingEvent(event.book_id));
            }
        }

        Ok(LibrarySnapshot::new(books, events, notes))
    }

    fn load_books(&self, owner: &str) -> Result<Vec<Book>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, format, total, total_page, created_at
             FROM book WHERE owner = ?1 ORDER BY created_at ASC",
        )?;
        let mut books = stmt
            .query_map([owner], |row| {
                Ok(Book {
                    id: parse_uuid(row.get::<_, String>(0)?)?,
                    title: row.get(1)?,
                    authors: Vec::new(),
                    format: int_to_format(row.get(2)?),
                    total: row.get(3)?,
                    total_page: row.get(4)?,
                    created_at: parse_ts(row.get::<_, String>(5)?)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<Book>>>()?;

        let mut author_stmt = self.conn.prepare(
            "SELECT a.name FROM author a
             JOIN book_author ba ON ba.author_id = a.id
             WHERE ba.book_id = ?1 ORDER BY ba.ord ASC",
        )?;
        for book in &mut books {
            book.authors = author_stmt
                .query_map([book.id.to_string()], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
        }
        Ok(books)
    }

    fn load_events(&self, owner: &str) -> Result<Vec<StatusLog>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, book_id, position, created_at
             FROM status_log WHERE owner = ?1 ORDER BY created_at ASC",
        )?;
        let events = stmt
            .query_map([owner], |row| {
                Ok(StatusLog {
                    id: parse_uuid(row.get::<_, String>(0)?)?,
                    book_id: parse_uuid(row.get::<_, String>(1)?)?,
                    position: row.get(2)?,
                    created_at: parse_ts(row.get::<_, String>(3)?)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<StatusLog>>>()?;
        Ok(events)
    }

    fn load_notes(&self, owner: &str) -> Result<Vec<Note>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, book_id, position, content, quote_text, created_at
             FROM note WHERE owner = ?1 ORDER BY position ASC",
        )?;
        let notes = stmt
            .query_map([owner], |row| {
                Ok(Note {
                    id: parse_uuid(row.get::<_, String>(0)?)?,
                    book_id: parse_uuid(row.get::<_, String>(1)?)?,
                    position: row.get(2)?,
                    content: row.get(3)?,
                    quote_text: row.get(4)?,
                    created_at: parse_ts(row.get::<_, String>(5)?)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<Note>>>()?;
        Ok(notes)
    }
}

fn format_to_int(format: BookFormat) -> i64 {
    match format {
        BookFormat::Paged => 0,
        BookFormat::LocationBased => 1,
    }
}

fn int_to_format(value: i64) -> BookFormat {
    if value == 1 {
        BookFormat::LocationBased
    } else {
        BookFormat::Paged
    }
}

fn parse_uuid(s: String) -> rusqlite::Result<Uuid> {
    Uuid::from_str(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_ts(s: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::<Utc>::from_str(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{number_of_books, BookCountScope};
    use crate::progress::ProgressRecord;
    use crate::window::DateWindow;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_book_roundtrip_keeps_author_order() {
        let store = ReadingStore::open_in_memory().unwrap();
        let book = store
            .add_book(
                "user",
                "Collected Essays",
                vec!["Zola".to_string(), "Abe".to_string()],
                BookFormat::Paged,
                320,
                None,
                ts("2022-01-01T00:00:00Z"),
            )
            .unwrap();

        let snapshot = store.snapshot("user").unwrap();
        let loaded = snapshot.book(book.id).unwrap();
        assert_eq!(loaded.title, "Collected Essays");
        // Attachment order, not alphabetical.
        assert_eq!(loaded.authors, ["Zola".to_string(), "Abe".to_string()]);
        assert_eq!(loaded.format, BookFormat::Paged);
    }

    #[test]
    fn test_add_book_enforces_invariants() {
        let store = ReadingStore::open_in_memory().unwrap();
        let err = store
            .add_book(
                "user",
                "Broken",
                vec![],
                BookFormat::LocationBased,
                2500,
                None,
                ts("2022-01-01T00:00:00Z"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Model(ModelError::InvalidTotalPage)
        ));
    }

    #[test]
    fn test_author_update_garbage_collects_orphans() {
        let store = ReadingStore::open_in_memory().unwrap();
        let book = store
            .add_book(
                "user",
                "A Book",
                vec!["Old Author".to_string()],
                BookFormat::Paged,
                100,
                None,
                ts("2022-01-01T00:00:00Z"),
            )
            .unwrap();

        store
            .update_book_authors(book.id, vec!["New Author".to_string()])
            .unwrap();

        let remaining: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM author", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 1);

        let snapshot = store.snapshot("user").unwrap();
        assert_eq!(
            snapshot.book(book.id).unwrap().authors,
            ["New Author".to_string()]
        );
    }

    #[test]
    fn test_shared_author_survives_gc() {
        let store = ReadingStore::open_in_memory().unwrap();
        let first = store
            .add_book(
                "user",
                "First",
                vec!["Shared".to_string()],
                BookFormat::Paged,
                100,
                None,
                ts("2022-01-01T00:00:00Z"),
            )
            .unwrap();
        store
            .add_book(
                "user",
                "Second",
                vec!["Shared".to_string()],
                BookFormat::Paged,
                100,
                None,
                ts("2022-01-02T00:00:00Z"),
            )
            .unwrap();

        store
            .update_book_authors(first.id, vec!["Solo".to_string()])
            .unwrap();

        let names: Vec<String> = {
            let mut stmt = store
                .connection()
                .prepare("SELECT name FROM author ORDER BY name")
                .unwrap();
            let rows = stmt
                .query_map([], |row| row.get(0))
                .unwrap()
                .collect::<rusqlite::Result<Vec<String>>>()
                .unwrap();
            rows
        };
        assert_eq!(names, ["Shared".to_string(), "Solo".to_string()]);
    }

    #[test]
    fn test_log_progress_validates_position() {
        let store = ReadingStore::open_in_memory().unwrap();
        let book = store
            .add_book(
                "user",
                "Short Book",
                vec!["A".to_string()],
                BookFormat::Paged,
                110,
                None,
                ts("2022-01-01T00:00:00Z"),
            )
            .unwrap();

        let err = store
            .log_progress("user", book.id, 111, ts("2022-01-02T09:00:00Z"))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::PositionOutOfRange {
                position: 111,
                total: 110
            }
        ));

        // Finishing the book exactly is fine, and so is repeating it.
        store
            .log_progress("user", book.id, 110, ts("2022-01-03T09:00:00Z"))
            .unwrap();
        store
            .log_progress("user", book.id, 110, ts("2022-01-04T09:00:00Z"))
            .unwrap();
    }

    #[test]
    fn test_log_progress_unknown_book() {
        let store = ReadingStore::open_in_memory().unwrap();
        let err = store
            .log_progress("user", Uuid::new_v4(), 10, ts("2022-01-02T09:00:00Z"))
            .unwrap_err();
        assert!(matches!(err, StoreError::BookNotFound(_)));
    }

    #[test]
    fn test_snapshot_is_owner_scoped() {
        let store = ReadingStore::open_in_memory().unwrap();
        let mine = store
            .add_book(
                "me",
                "Mine",
                vec!["A".to_string()],
                BookFormat::Paged,
                100,
                None,
                ts("2022-01-01T00:00:00Z"),
            )
            .unwrap();
        store
            .add_book(
                "other",
                "Theirs",
                vec!["B".to_string()],
                BookFormat::Paged,
                100,
                None,
                ts("2022-01-01T00:00:00Z"),
            )
            .unwrap();
        store
            .log_progress("me", mine.id, 40, ts("2022-01-02T09:00:00Z"))
            .unwrap();

        let snapshot = store.snapshot("me").unwrap();
        assert_eq!(snapshot.books().len(), 1);
        assert_eq!(snapshot.events().len(), 1);
    }

    #[test]
    fn test_snapshot_feeds_the_engine() {
        let store = ReadingStore::open_in_memory().unwrap();
        let book = store
            .add_book(
                "user",
                "Kindle Book",
                vec!["A".to_string()],
                BookFormat::LocationBased,
                2500,
                Some(220),
                ts("2022-01-01T00:00:00Z"),
            )
            .unwrap();
        store
            .log_progress("user", book.id, 120, ts("2022-01-01T09:00:00Z"))
            .unwrap();
        store
            .log_progress("user", book.id, 1111, ts("2022-01-02T09:00:00Z"))
            .unwrap();

        let snapshot = store.snapshot("user").unwrap();
        let records = ProgressRecord::build_all(&snapshot);
        assert_eq!(records[1].diff.value, 991);
        assert_eq!(records[1].diff.page, 88);

        let window = DateWindow::new(
            "2022-01-01".parse().unwrap(),
            "2022-01-02".parse().unwrap(),
        );
        let counts = number_of_books(&snapshot, &window, BookCountScope::WindowedOnly);
        assert_eq!(counts.reading, 1);
    }

    #[test]
    fn test_notes_load_in_position_order() {
        let store = ReadingStore::open_in_memory().unwrap();
        let book = store
            .add_book(
                "user",
                "A Book",
                vec!["A".to_string()],
                BookFormat::Paged,
                300,
                None,
                ts("2022-01-01T00:00:00Z"),
            )
            .unwrap();
        store
            .add_note(
                "user",
                book.id,
                200,
                "later thought",
                None,
                ts("2022-01-02T09:00:00Z"),
            )
            .unwrap();
        store
            .add_note(
                "user",
                book.id,
                50,
                "early thought",
                Some("a quote"),
                ts("2022-01-03T09:00:00Z"),
            )
            .unwrap();

        let snapshot = store.snapshot("user").unwrap();
        let positions: Vec<u32> = snapshot.notes().iter().map(|n| n.position).collect();
        assert_eq!(positions, [50, 200]);
        assert_eq!(snapshot.notes()[0].quote_text.as_deref(), Some("a quote"));
    }
}
