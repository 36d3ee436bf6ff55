//! Repositories: one per functional area, each borrowing the shared pool.

pub mod borrowers;
pub mod catalog;
pub mod loans;

pub use borrowers::BorrowerRepo;
pub use catalog::CatalogRepo;
pub use loans::LoanRepo;
