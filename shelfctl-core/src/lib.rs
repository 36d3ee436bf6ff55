//! Core domain types for shelfctl.
//!
//! Holds the error taxonomy, validated field newtypes, and the row/listing
//! structs shared by the repository and CLI crates. No database access
//! happens here; `shelfctl-db` owns the SQL.

pub mod error;
pub mod models;

pub use error::{Result, ShelfError};
