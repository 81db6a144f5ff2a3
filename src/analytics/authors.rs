use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::Book;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub name: String,
    pub count: usize,
}

/// Books-per-author ranking over the given book set, descending by count
/// with name-ascending tie-break so the order is deterministic. `limit`
/// truncates the ranking; `None` returns everything.
pub fn authors_ranking<'a, I>(books: I, limit: Option<usize>) -> Vec<AuthorCount>
where
    I: IntoIterator<Item = &'a Book>,
{
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for book in books {
        // A duplicated name within one book still counts that book once.
        let mut seen = HashSet::new();
        for name in book.authors() {
            if seen.insert(name.as_str()) {
                *counts.entry(name.as_str()).or_insert(0) += 1;
            }
        }
    }

    let mut ranking: Vec<AuthorCount> = counts
        .into_iter()
        .map(|(name, count)| AuthorCount {
            name: name.to_string(),
            count,
        })
        .collect();
    ranking.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    if let Some(limit) = limit {
        ranking.truncate(limit);
    }
    ranking
}
