//! Schema migrations for the library tables.

use sqlx::SqlitePool;

use shelfctl_core::Result;

/// Create all tables and indexes. Idempotent; run at every startup.
pub async fn run(pool: &SqlitePool) -> Result<()> {
    tracing::debug!("running schema migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            author_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            genre_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            book_id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author_id INTEGER NOT NULL REFERENCES authors(author_id),
            genre_id INTEGER NOT NULL REFERENCES genres(genre_id),
            published_year INTEGER NOT NULL,
            is_available BOOLEAN NOT NULL DEFAULT TRUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS borrowers (
            borrower_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS loans (
            loan_id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL REFERENCES books(book_id),
            borrower_id INTEGER NOT NULL REFERENCES borrowers(borrower_id),
            loan_date DATE NOT NULL,
            return_date DATE
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::debug!("schema migrations complete");
    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<()> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_loans_book ON loans(book_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_loans_borrower ON loans(borrower_id)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_loans_active ON loans(borrower_id) WHERE return_date IS NULL",
    )
    .execute(pool)
    .await?;

    Ok(())
}
