use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::analytics::{
    authors_ranking, number_of_books, pages_daily, pages_read, reading_days, AuthorCount,
    BookCountScope, BookCounts, PagesRead, ReadingDays,
};
use crate::model::LibrarySnapshot;
use crate::window::DateWindow;

/// Per-call knobs for report assembly, passed explicitly rather than
/// through any ambient context.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub scope: BookCountScope,
    /// Ranking truncation; `None` keeps every author. Call sites typically
    /// use 5 for a compact profile card and 8 for the fuller view.
    pub author_limit: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            scope: BookCountScope::IncludeIdle,
            author_limit: None,
        }
    }
}

/// Rank-ordered author counts, serialized as a `{name: count}` map that
/// preserves ranking order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRanking(pub Vec<AuthorCount>);

impl Serialize for AuthorRanking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for author in &self.0 {
            map.serialize_entry(&author.name, &author.count)?;
        }
        map.end()
    }
}

/// The full analytics payload served to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub number_of_books: BookCounts,
    pub pages_read: PagesRead,
    pub days: ReadingDays,
    pub authors_count: AuthorRanking,
    /// Ascending by date.
    pub pages_daily: BTreeMap<NaiveDate, u64>,
}

impl AnalyticsReport {
    pub fn build(snapshot: &LibrarySnapshot, window: &DateWindow, options: &ReportOptions) -> Self {
        Self {
            number_of_books: number_of_books(snapshot, window, options.scope),
            pages_read: pages_read(snapshot, window),
            days: reading_days(snapshot, window.end),
            authors_count: AuthorRanking(authors_ranking(snapshot.books(), options.author_limit)),
            pages_daily: pages_daily(snapshot),
        }
    }
}
