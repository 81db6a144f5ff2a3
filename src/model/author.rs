use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder used when a book is registered with no author at all.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

// Joins CJK given/family names that arrive split by a space ("山田 太郎" -> "山田太郎").
static CJK_NAME_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new("([亜-熙ぁ-んァ-ヶ]) ([亜-熙ぁ-んァ-ヶ])").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
}

impl Author {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}

pub fn normalize_author_name(name: &str) -> String {
    let name = name.replace('　', " ");
    CJK_NAME_GAP.replace_all(&name, "$1$2").into_owned()
}

/// Normalizes a caller-supplied author list; an empty list becomes the
/// single placeholder entry so every book stays attributable.
pub fn normalize_authors(names: Vec<String>) -> Vec<String> {
    if names.is_empty() {
        return vec![UNKNOWN_AUTHOR.to_string()];
    }
    names.iter().map(|n| normalize_author_name(n)).collect()
}
