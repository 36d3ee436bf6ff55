//! Loan listing shape and the Active/Closed state.

use chrono::NaiveDate;

/// Loan lifecycle state, derived from the nullable return date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Active,
    Closed,
}

/// Loan joined with book title and borrower name for display.
/// `return_date = None` means the loan is still open.
#[derive(Debug, Clone)]
pub struct LoanListing {
    pub loan_id: i64,
    pub book_title: String,
    pub borrower_name: String,
    pub loan_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl LoanListing {
    pub fn status(&self) -> LoanStatus {
        match self.return_date {
            None => LoanStatus::Active,
            Some(_) => LoanStatus::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_return_date() {
        let mut loan = LoanListing {
            loan_id: 1,
            book_title: "Dune".to_owned(),
            borrower_name: "John".to_owned(),
            loan_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            return_date: None,
        };
        assert_eq!(loan.status(), LoanStatus::Active);

        loan.return_date = NaiveDate::from_ymd_opt(2024, 5, 8);
        assert_eq!(loan.status(), LoanStatus::Closed);
    }
}
