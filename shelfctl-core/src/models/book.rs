//! Book rows and the joined listing shape used for display.

use std::fmt;

use sqlx::prelude::FromRow;

use super::ValidationError;

/// Raw book record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct Book {
    pub book_id: i64,
    pub title: String,
    pub author_id: i64,
    pub genre_id: i64,
    pub published_year: i64,
    pub is_available: bool,
}

/// Availability label computed from the `is_available` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Borrowed,
}

impl Availability {
    pub fn from_flag(is_available: bool) -> Self {
        if is_available {
            Self::Available
        } else {
            Self::Borrowed
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Borrowed => "Borrowed",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Book joined with author and genre names for list/search display.
#[derive(Debug, Clone)]
pub struct BookListing {
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i64,
    pub availability: Availability,
}

/// Input for catalog insertion.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author_id: i64,
    pub genre_id: i64,
    pub published_year: i64,
}

impl NewBook {
    pub fn new(
        title: &str,
        author_id: i64,
        genre_id: i64,
        published_year: i64,
    ) -> Result<Self, ValidationError> {
        if title.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        Ok(Self {
            title: title.to_owned(),
            author_id,
            genre_id,
            published_year,
        })
    }
}

/// Full replacement values for a book update. The CLI flow merges blank
/// prompt answers with the current row before building one of these.
#[derive(Debug, Clone)]
pub struct BookUpdate {
    pub title: String,
    pub author_id: i64,
    pub genre_id: i64,
    pub published_year: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_labels() {
        assert_eq!(Availability::from_flag(true).label(), "Available");
        assert_eq!(Availability::from_flag(false).to_string(), "Borrowed");
    }

    #[test]
    fn new_book_requires_title() {
        let err = NewBook::new("", 1, 1, 2020).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "title" }));
        assert!(NewBook::new("T", 1, 1, 2020).is_ok());
    }
}
