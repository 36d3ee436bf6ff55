//! Loan repository: the Active → Closed lifecycle.
//!
//! Borrow and return each pair a loan-row write with the book's availability
//! flip; both statements run inside one transaction so a failure between
//! them cannot leave the flag inconsistent with the loan state. Dropping an
//! uncommitted sqlx transaction rolls it back on every early-return path.

use chrono::{Local, NaiveDate};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use shelfctl_core::models::LoanListing;
use shelfctl_core::{Result, ShelfError};

const LISTING_QUERY: &str = r#"
    SELECT loans.loan_id, books.title, borrowers.name, loans.loan_date, loans.return_date
    FROM loans
    JOIN books ON loans.book_id = books.book_id
    JOIN borrowers ON loans.borrower_id = borrowers.borrower_id
"#;

/// Loan repository.
pub struct LoanRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LoanRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all loans with book title and borrower name, newest first.
    pub async fn list(&self) -> Result<Vec<LoanListing>> {
        let rows = sqlx::query(&format!(
            "{LISTING_QUERY} ORDER BY loans.loan_date DESC, loans.loan_id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(listing_from_row).collect())
    }

    /// Keyword search over book title and borrower name. Case-insensitive
    /// substring match, OR-combined.
    pub async fn search(&self, keyword: &str) -> Result<Vec<LoanListing>> {
        let pattern = format!("%{}%", keyword.to_lowercase());
        let rows = sqlx::query(&format!(
            "{LISTING_QUERY} \
             WHERE LOWER(books.title) LIKE ? \
                OR LOWER(borrowers.name) LIKE ? \
             ORDER BY loans.loan_date DESC, loans.loan_id DESC"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(listing_from_row).collect())
    }

    /// Fetch one loan in listing shape.
    pub async fn get(&self, loan_id: i64) -> Result<LoanListing> {
        let row = sqlx::query(&format!("{LISTING_QUERY} WHERE loans.loan_id = ?"))
            .bind(loan_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| ShelfError::not_found("loan", loan_id))?;

        Ok(listing_from_row(row))
    }

    /// Borrow a book: checks book existence, borrower existence, and
    /// availability (distinct failures, no side effects), then inserts the
    /// loan dated today and flips the book to unavailable.
    pub async fn borrow(&self, book_id: i64, borrower_id: i64) -> Result<LoanListing> {
        let today = Local::now().date_naive();
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, (String, bool)>(
            "SELECT title, is_available FROM books WHERE book_id = ?",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((title, is_available)) = book else {
            return Err(ShelfError::not_found("book", book_id));
        };

        let borrower = sqlx::query_as::<_, (String,)>(
            "SELECT name FROM borrowers WHERE borrower_id = ?",
        )
        .bind(borrower_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((borrower_name,)) = borrower else {
            return Err(ShelfError::not_found("borrower", borrower_id));
        };

        if !is_available {
            return Err(ShelfError::BookUnavailable { book_id });
        }

        let loan_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO loans (book_id, borrower_id, loan_date) VALUES (?, ?, ?) \
             RETURNING loan_id",
        )
        .bind(book_id)
        .bind(borrower_id)
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET is_available = FALSE WHERE book_id = ?")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(loan_id, book_id, borrower_id, "book borrowed");

        Ok(LoanListing {
            loan_id,
            book_title: title,
            borrower_name,
            loan_date: today,
            return_date: None,
        })
    }

    /// Close an active loan: stamps today's date and flips the book back to
    /// available. Fails with "no active loan found" whether the id is
    /// absent or the loan is already closed.
    pub async fn return_loan(&self, loan_id: i64) -> Result<LoanListing> {
        let today = Local::now().date_naive();
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, (i64, String, String, NaiveDate)>(
            "SELECT loans.book_id, books.title, borrowers.name, loans.loan_date \
             FROM loans \
             JOIN books ON loans.book_id = books.book_id \
             JOIN borrowers ON loans.borrower_id = borrowers.borrower_id \
             WHERE loans.loan_id = ? AND loans.return_date IS NULL",
        )
        .bind(loan_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((book_id, title, borrower_name, loan_date)) = loan else {
            return Err(ShelfError::NoActiveLoan { loan_id });
        };

        sqlx::query("UPDATE loans SET return_date = ? WHERE loan_id = ?")
            .bind(today)
            .bind(loan_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE books SET is_available = TRUE WHERE book_id = ?")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(loan_id, book_id, "book returned");

        Ok(LoanListing {
            loan_id,
            book_title: title,
            borrower_name,
            loan_date,
            return_date: Some(today),
        })
    }

    /// Administrative return-date correction. Only permitted on a closed
    /// loan, and the new date may not predate the loan date; a failed check
    /// leaves the row unchanged.
    pub async fn modify(&self, loan_id: i64, new_return_date: NaiveDate) -> Result<LoanListing> {
        let loan = sqlx::query_as::<_, (NaiveDate, Option<NaiveDate>)>(
            "SELECT loan_date, return_date FROM loans WHERE loan_id = ?",
        )
        .bind(loan_id)
        .fetch_optional(self.pool)
        .await?;
        let Some((loan_date, return_date)) = loan else {
            return Err(ShelfError::not_found("loan", loan_id));
        };

        if return_date.is_none() {
            return Err(ShelfError::LoanStillActive { loan_id });
        }
        if new_return_date < loan_date {
            return Err(ShelfError::ReturnBeforeLoan { loan_date });
        }

        sqlx::query("UPDATE loans SET return_date = ? WHERE loan_id = ?")
            .bind(new_return_date)
            .bind(loan_id)
            .execute(self.pool)
            .await?;

        tracing::info!(loan_id, %new_return_date, "loan return date corrected");
        self.get(loan_id).await
    }
}

fn listing_from_row(row: SqliteRow) -> LoanListing {
    LoanListing {
        loan_id: row.get("loan_id"),
        book_title: row.get("title"),
        borrower_name: row.get("name"),
        loan_date: row.get("loan_date"),
        return_date: row.get("return_date"),
    }
}
