//! Catalog repository.
//!
//! Books joined with author/genre names for display; author and genre
//! references are existence-checked before any insert or update so a failed
//! reference leaves the table untouched.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use shelfctl_core::models::{Availability, Book, BookListing, BookUpdate, NewBook};
use shelfctl_core::{Result, ShelfError};

/// Shared SELECT for the joined listing shape.
const LISTING_QUERY: &str = r#"
    SELECT books.book_id, books.title, authors.name AS author, genres.name AS genre,
           books.published_year, books.is_available
    FROM books
    JOIN authors ON books.author_id = authors.author_id
    JOIN genres ON books.genre_id = genres.genre_id
"#;

/// Catalog repository.
pub struct CatalogRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CatalogRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all books sorted by id, with author/genre names and the
    /// availability label.
    pub async fn list(&self) -> Result<Vec<BookListing>> {
        let rows = sqlx::query(&format!("{LISTING_QUERY} ORDER BY books.book_id ASC"))
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(listing_from_row).collect())
    }

    /// Keyword search across title, author name, genre name, and published
    /// year as text. Case-insensitive substring match, OR-combined.
    pub async fn search(&self, keyword: &str) -> Result<Vec<BookListing>> {
        let pattern = format!("%{}%", keyword.to_lowercase());
        let rows = sqlx::query(&format!(
            "{LISTING_QUERY} \
             WHERE LOWER(books.title) LIKE ? \
                OR LOWER(authors.name) LIKE ? \
                OR LOWER(genres.name) LIKE ? \
                OR CAST(books.published_year AS TEXT) LIKE ? \
             ORDER BY books.book_id ASC"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(listing_from_row).collect())
    }

    /// Fetch one book in listing shape.
    pub async fn get(&self, book_id: i64) -> Result<BookListing> {
        let row = sqlx::query(&format!("{LISTING_QUERY} WHERE books.book_id = ?"))
            .bind(book_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| ShelfError::not_found("book", book_id))?;

        Ok(listing_from_row(row))
    }

    /// Fetch the raw row (with author/genre ids), for the modify flow's
    /// current-value defaults.
    pub async fn get_row(&self, book_id: i64) -> Result<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT book_id, title, author_id, genre_id, published_year, is_available \
             FROM books WHERE book_id = ?",
        )
        .bind(book_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| ShelfError::not_found("book", book_id))
    }

    /// Insert a new book with `is_available = TRUE` after verifying its
    /// author and genre references. A missing reference cancels the insert
    /// and names the missing id.
    pub async fn add(&self, book: NewBook) -> Result<BookListing> {
        self.check_references(book.author_id, book.genre_id).await?;

        let book_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO books (title, author_id, genre_id, published_year, is_available) \
             VALUES (?, ?, ?, ?, TRUE) RETURNING book_id",
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.genre_id)
        .bind(book.published_year)
        .fetch_one(self.pool)
        .await?;

        tracing::info!(book_id, title = %book.title, "book added");
        self.get(book_id).await
    }

    /// Delete a book by id. The yes/no confirmation lives in the CLI flow.
    pub async fn remove(&self, book_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM books WHERE book_id = ?")
            .bind(book_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ShelfError::not_found("book", book_id));
        }

        tracing::info!(book_id, "book removed");
        Ok(())
    }

    /// Replace a book's fields, re-validating the new author and genre
    /// references before committing.
    pub async fn update(&self, book_id: i64, update: BookUpdate) -> Result<BookListing> {
        // Existence check first so a bad id reports as "book not found"
        // rather than a silent zero-row update.
        self.get_row(book_id).await?;
        self.check_references(update.author_id, update.genre_id)
            .await?;

        sqlx::query(
            "UPDATE books SET title = ?, author_id = ?, genre_id = ?, published_year = ? \
             WHERE book_id = ?",
        )
        .bind(&update.title)
        .bind(update.author_id)
        .bind(update.genre_id)
        .bind(update.published_year)
        .bind(book_id)
        .execute(self.pool)
        .await?;

        tracing::info!(book_id, "book updated");
        self.get(book_id).await
    }

    async fn check_references(&self, author_id: i64, genre_id: i64) -> Result<()> {
        let author = sqlx::query("SELECT author_id FROM authors WHERE author_id = ?")
            .bind(author_id)
            .fetch_optional(self.pool)
            .await?;
        if author.is_none() {
            return Err(ShelfError::not_found("author", author_id));
        }

        let genre = sqlx::query("SELECT genre_id FROM genres WHERE genre_id = ?")
            .bind(genre_id)
            .fetch_optional(self.pool)
            .await?;
        if genre.is_none() {
            return Err(ShelfError::not_found("genre", genre_id));
        }

        Ok(())
    }
}

fn listing_from_row(row: SqliteRow) -> BookListing {
    BookListing {
        book_id: row.get("book_id"),
        title: row.get("title"),
        author: row.get("author"),
        genre: row.get("genre"),
        published_year: row.get("published_year"),
        availability: Availability::from_flag(row.get("is_available")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{memory_pool, seed_author_genre};

    fn sample_book() -> NewBook {
        NewBook::new("The Rust Programming Language", 1, 1, 2019).unwrap()
    }

    #[tokio::test]
    async fn add_then_get_is_available() {
        let pool = memory_pool().await;
        seed_author_genre(&pool).await;
        let repo = CatalogRepo::new(&pool);

        let added = repo.add(sample_book()).await.unwrap();
        let fetched = repo.get(added.book_id).await.unwrap();

        assert_eq!(fetched.title, "The Rust Programming Language");
        assert_eq!(fetched.author, "Sample Author");
        assert_eq!(fetched.genre, "Sample Genre");
        assert_eq!(fetched.availability, Availability::Available);
    }

    #[tokio::test]
    async fn add_with_missing_author_inserts_nothing() {
        let pool = memory_pool().await;
        seed_author_genre(&pool).await;
        let repo = CatalogRepo::new(&pool);

        let book = NewBook::new("Ghost", 99, 1, 2020).unwrap();
        let err = repo.add(book).await.unwrap_err();
        assert_eq!(err.to_string(), "author not found with ID: 99");

        let book = NewBook::new("Ghost", 1, 42, 2020).unwrap();
        let err = repo.add(book).await.unwrap_err();
        assert_eq!(err.to_string(), "genre not found with ID: 42");

        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_matches_all_columns_case_insensitively() {
        let pool = memory_pool().await;
        seed_author_genre(&pool).await;
        let repo = CatalogRepo::new(&pool);

        repo.add(sample_book()).await.unwrap();
        repo.add(NewBook::new("Other", 1, 1, 1999).unwrap())
            .await
            .unwrap();

        // Title substring, mixed case
        let hits = repo.search("rUsT").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "The Rust Programming Language");

        // Author and genre names match every row here
        assert_eq!(repo.search("sample").await.unwrap().len(), 2);

        // Published year as text
        let hits = repo.search("199").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].published_year, 1999);

        assert!(repo.search("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_sorts_by_id() {
        let pool = memory_pool().await;
        seed_author_genre(&pool).await;
        let repo = CatalogRepo::new(&pool);

        let a = repo.add(NewBook::new("A", 1, 1, 2001).unwrap()).await.unwrap();
        let b = repo.add(NewBook::new("B", 1, 1, 2002).unwrap()).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(a.book_id < b.book_id);
        assert_eq!(all[0].book_id, a.book_id);
    }

    #[tokio::test]
    async fn remove_missing_book_reports_not_found() {
        let pool = memory_pool().await;
        let repo = CatalogRepo::new(&pool);

        let err = repo.remove(5).await.unwrap_err();
        assert!(matches!(
            err,
            ShelfError::NotFound { resource: "book", id: 5 }
        ));
    }

    #[tokio::test]
    async fn update_revalidates_references() {
        let pool = memory_pool().await;
        seed_author_genre(&pool).await;
        let repo = CatalogRepo::new(&pool);

        let added = repo.add(sample_book()).await.unwrap();

        let err = repo
            .update(
                added.book_id,
                BookUpdate {
                    title: "Renamed".to_owned(),
                    author_id: 7,
                    genre_id: 1,
                    published_year: 2020,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShelfError::NotFound { resource: "author", id: 7 }
        ));

        // Unchanged after the failed update
        let current = repo.get(added.book_id).await.unwrap();
        assert_eq!(current.title, "The Rust Programming Language");

        let updated = repo
            .update(
                added.book_id,
                BookUpdate {
                    title: "Renamed".to_owned(),
                    author_id: 1,
                    genre_id: 1,
                    published_year: 2020,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.published_year, 2020);
    }
}
