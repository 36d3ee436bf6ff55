//! Structured error types for shelfctl.
//!
//! Uses `thiserror` for the library crates; the binary wraps these in
//! `anyhow` where convenient. Every variant renders as a single
//! user-facing line, since operation failures are reported at the menu
//! boundary and never propagate further.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::ValidationError;

/// Main error type for shelfctl operations.
#[derive(Error, Debug)]
pub enum ShelfError {
    /// A field failed validation before any statement ran
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced row does not exist (author, genre, book, borrower, loan)
    #[error("{resource} not found with ID: {id}")]
    NotFound { resource: &'static str, id: i64 },

    /// Return/modify target is absent or already closed
    #[error("no active loan found with loan ID: {loan_id}")]
    NoActiveLoan { loan_id: i64 },

    /// Another borrower already uses this email or phone
    #[error("a borrower with email '{email}' or phone '{phone}' already exists")]
    DuplicateBorrower { email: String, phone: String },

    /// Borrower removal blocked by open loans
    #[error("borrower '{name}' cannot be removed: {count} book(s) currently borrowed")]
    ActiveLoans { name: String, count: i64 },

    /// Borrow attempt against a book that is already out
    #[error("book {book_id} is not available for borrowing")]
    BookUnavailable { book_id: i64 },

    /// Corrected return date would predate the loan
    #[error("the return date cannot be earlier than the loan date ({loan_date})")]
    ReturnBeforeLoan { loan_date: NaiveDate },

    /// Date correction attempted on a loan that is still open
    #[error("loan {loan_id} has not been returned yet; modification is not allowed")]
    LoanStillActive { loan_id: i64 },

    /// Underlying store failure
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Result type alias for shelfctl operations.
pub type Result<T> = std::result::Result<T, ShelfError>;

impl ShelfError {
    /// Create a not-found error for a referenced row.
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound { resource, id }
    }
}
