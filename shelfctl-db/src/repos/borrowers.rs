//! Borrower repository.
//!
//! Listing carries a computed loan count (LEFT JOIN / COUNT, single query).
//! Uniqueness of email and phone is checked up front so the duplicate is
//! reported before any insert; the UNIQUE constraints remain as a backstop.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use shelfctl_core::models::{Borrower, BorrowerListing, NewBorrower};
use shelfctl_core::{Result, ShelfError};

const LISTING_QUERY: &str = r#"
    SELECT borrowers.borrower_id, borrowers.name, borrowers.email, borrowers.phone,
           COUNT(loans.book_id) AS books_borrowed
    FROM borrowers
    LEFT JOIN loans ON borrowers.borrower_id = loans.borrower_id
"#;

/// Borrower repository.
pub struct BorrowerRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BorrowerRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all borrowers with their loan counts, ordered by id.
    pub async fn list(&self) -> Result<Vec<BorrowerListing>> {
        let rows = sqlx::query(&format!(
            "{LISTING_QUERY} GROUP BY borrowers.borrower_id ORDER BY borrowers.borrower_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(listing_from_row).collect())
    }

    /// Keyword search over name, email, and phone. Case-insensitive
    /// substring match, OR-combined.
    pub async fn search(&self, keyword: &str) -> Result<Vec<BorrowerListing>> {
        let pattern = format!("%{}%", keyword.to_lowercase());
        let rows = sqlx::query(&format!(
            "{LISTING_QUERY} \
             WHERE LOWER(borrowers.name) LIKE ? \
                OR LOWER(borrowers.email) LIKE ? \
                OR LOWER(borrowers.phone) LIKE ? \
             GROUP BY borrowers.borrower_id ORDER BY borrowers.borrower_id"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(listing_from_row).collect())
    }

    /// Fetch one borrower row.
    pub async fn get(&self, borrower_id: i64) -> Result<Borrower> {
        sqlx::query_as::<_, Borrower>(
            "SELECT borrower_id, name, email, phone FROM borrowers WHERE borrower_id = ?",
        )
        .bind(borrower_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| ShelfError::not_found("borrower", borrower_id))
    }

    /// Insert a validated borrower, rejecting duplicate email or phone
    /// before the insert runs.
    pub async fn add(&self, borrower: NewBorrower) -> Result<Borrower> {
        self.check_duplicates(borrower.email.as_str(), borrower.phone.as_str(), None)
            .await?;

        let borrower_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO borrowers (name, email, phone) VALUES (?, ?, ?) RETURNING borrower_id",
        )
        .bind(borrower.name.as_str())
        .bind(borrower.email.as_str())
        .bind(borrower.phone.as_str())
        .fetch_one(self.pool)
        .await?;

        tracing::info!(borrower_id, name = borrower.name.as_str(), "borrower added");
        self.get(borrower_id).await
    }

    /// Count of this borrower's loans with a null return date.
    pub async fn active_loan_count(&self, borrower_id: i64) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM loans WHERE borrower_id = ? AND return_date IS NULL",
        )
        .bind(borrower_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Delete a borrower. Refused while any of their loans is still open.
    /// The yes/no confirmation lives in the CLI flow.
    pub async fn remove(&self, borrower_id: i64) -> Result<()> {
        let borrower = self.get(borrower_id).await?;

        let open = self.active_loan_count(borrower_id).await?;
        if open > 0 {
            return Err(ShelfError::ActiveLoans {
                name: borrower.name,
                count: open,
            });
        }

        // Closed loan rows still reference the borrower and foreign keys are
        // enforced, so the history goes in the same transaction.
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM loans WHERE borrower_id = ?")
            .bind(borrower_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM borrowers WHERE borrower_id = ?")
            .bind(borrower_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(borrower_id, "borrower removed");
        Ok(())
    }

    /// Replace a borrower's fields with a validated set, keeping email/phone
    /// uniqueness (the borrower's own row is excluded from the check).
    pub async fn update(&self, borrower_id: i64, borrower: NewBorrower) -> Result<Borrower> {
        self.get(borrower_id).await?;
        self.check_duplicates(
            borrower.email.as_str(),
            borrower.phone.as_str(),
            Some(borrower_id),
        )
        .await?;

        sqlx::query("UPDATE borrowers SET name = ?, email = ?, phone = ? WHERE borrower_id = ?")
            .bind(borrower.name.as_str())
            .bind(borrower.email.as_str())
            .bind(borrower.phone.as_str())
            .bind(borrower_id)
            .execute(self.pool)
            .await?;

        tracing::info!(borrower_id, "borrower updated");
        self.get(borrower_id).await
    }

    async fn check_duplicates(
        &self,
        email: &str,
        phone: &str,
        exclude_id: Option<i64>,
    ) -> Result<()> {
        let existing = match exclude_id {
            Some(id) => {
                sqlx::query(
                    "SELECT borrower_id FROM borrowers \
                     WHERE (email = ? OR phone = ?) AND borrower_id != ?",
                )
                .bind(email)
                .bind(phone)
                .bind(id)
                .fetch_optional(self.pool)
                .await?
            }
            None => {
                sqlx::query("SELECT borrower_id FROM borrowers WHERE email = ? OR phone = ?")
                    .bind(email)
                    .bind(phone)
                    .fetch_optional(self.pool)
                    .await?
            }
        };

        if existing.is_some() {
            return Err(ShelfError::DuplicateBorrower {
                email: email.to_owned(),
                phone: phone.to_owned(),
            });
        }

        Ok(())
    }
}

fn listing_from_row(row: SqliteRow) -> BorrowerListing {
    BorrowerListing {
        borrower_id: row.get("borrower_id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        books_borrowed: row.get("books_borrowed"),
    }
}
