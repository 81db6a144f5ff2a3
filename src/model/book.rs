use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::author::normalize_authors;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("total must be a positive integer")]
    InvalidTotal,
    #[error("total_page must be a positive integer for location-based books")]
    InvalidTotalPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookFormat {
    /// Physical or paged book: positions are page numbers.
    Paged,
    /// E-reader book measured in device location units; needs `total_page`
    /// to convert locations into page-equivalents.
    LocationBased,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub authors: Vec<String>,
    pub format: BookFormat,
    pub total: u32,
    pub total_page: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Book {
    pub fn new(
        title: String,
        authors: Vec<String>,
        format: BookFormat,
        total: u32,
        total_page: Option<u32>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ModelError> {
        if total == 0 {
            return Err(ModelError::InvalidTotal);
        }
        if format == BookFormat::LocationBased && total_page.unwrap_or(0) == 0 {
            return Err(ModelError::InvalidTotalPage);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            authors: normalize_authors(authors),
            format,
            total,
            total_page,
            created_at,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::author::UNKNOWN_AUTHOR;

    fn ts() -> DateTime<Utc> {
        "2022-01-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_zero_total_rejected() {
        let err = Book::new(
            "Empty".to_string(),
            vec!["A".to_string()],
            BookFormat::Paged,
            0,
            None,
            ts(),
        )
        .unwrap_err();
        assert_eq!(err, ModelError::InvalidTotal);
    }

    #[test]
    fn test_location_based_requires_total_page() {
        for total_page in [None, Some(0)] {
            let err = Book::new(
                "Kindle".to_string(),
                vec!["A".to_string()],
                BookFormat::LocationBased,
                2500,
                total_page,
                ts(),
            )
            .unwrap_err();
            assert_eq!(err, ModelError::InvalidTotalPage);
        }
    }

    #[test]
    fn test_paged_book_without_total_page_is_fine() {
        let book = Book::new(
            "Paper".to_string(),
            vec![],
            BookFormat::Paged,
            110,
            None,
            ts(),
        )
        .unwrap();
        assert_eq!(book.total, 110);
        assert_eq!(book.authors(), [UNKNOWN_AUTHOR.to_string()]);
    }
}
