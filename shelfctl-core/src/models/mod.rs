//! Domain models: validated fields plus the row and listing shapes the
//! repositories return.

mod book;
mod borrower;
mod loan;
mod validation;

pub use book::{Availability, Book, BookListing, BookUpdate, NewBook};
pub use borrower::{Borrower, BorrowerListing, BorrowerName, Email, NewBorrower, Phone};
pub use loan::{LoanListing, LoanStatus};
pub use validation::ValidationError;
