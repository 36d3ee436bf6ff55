//! Database layer for shelfctl.
//!
//! Owns pool construction, schema migrations, and one repository per
//! functional area (catalog, borrowers, loans). Repositories borrow a ready
//! `SqlitePool`; resolving connection details is the caller's job.

pub mod migrations;
pub mod pool;
pub mod repos;
