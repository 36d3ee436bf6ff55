//! One function per menu action.
//!
//! Every flow follows the same shape: prompt, call the repository, print
//! either the result or the error, and return to the menu. Failures are
//! printed rather than propagated so a bad input never kills the session;
//! only prompt I/O errors bubble up as `anyhow::Error`.

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use shelfctl_core::models::{BookUpdate, LoanStatus, NewBook, NewBorrower, ValidationError};
use shelfctl_core::ShelfError;
use shelfctl_db::repos::{BorrowerRepo, CatalogRepo, LoanRepo};

use crate::prompt::Prompter;
use crate::render;

/// Print the error and swallow it, keeping the value on success.
fn report<T>(result: shelfctl_core::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            println!("\nError: {err}\n");
            None
        }
    }
}

fn report_validation(err: ValidationError) {
    println!("\nError: {err}\n");
}

fn parse_id(input: &str) -> Option<i64> {
    match input.trim().parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            report_validation(ValidationError::NotAnInteger {
                value: input.trim().to_owned(),
            });
            None
        }
    }
}

fn prompt_id(prompter: &mut dyn Prompter, message: &str) -> Result<Option<i64>> {
    let input = prompter.line(message)?;
    Ok(parse_id(&input))
}

fn parse_year(input: &str) -> Option<i64> {
    match input.trim().parse::<i64>() {
        Ok(year) => Some(year),
        Err(_) => {
            report_validation(ValidationError::InvalidFormat {
                field: "published year",
                reason: "must be a whole number",
            });
            None
        }
    }
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            report_validation(ValidationError::InvalidDate {
                value: input.trim().to_owned(),
            });
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Books

pub async fn list_books(pool: &SqlitePool) -> Result<()> {
    let Some(books) = report(CatalogRepo::new(pool).list().await) else {
        return Ok(());
    };

    if books.is_empty() {
        println!("\nNo books are currently available.\n");
        return Ok(());
    }

    println!("\n{}", render::book_table(&books));
    println!("Total number of books: {}\n", books.len());
    Ok(())
}

pub async fn search_books(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    let keyword = prompter.line("Enter a keyword to search for:")?;
    let keyword = keyword.trim();
    if keyword.is_empty() {
        println!("\nNo keyword entered. Please try again.\n");
        return Ok(());
    }

    let Some(books) = report(CatalogRepo::new(pool).search(keyword).await) else {
        return Ok(());
    };

    if books.is_empty() {
        println!("\nNo books found matching the keyword: '{keyword}'\n");
        return Ok(());
    }

    println!("\n{}", render::book_table(&books));
    println!("Total number of books found: {}\n", books.len());
    Ok(())
}

pub async fn add_book(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    let title = prompter.line("Enter the book title:")?;
    let Some(author_id) = prompt_id(prompter, "Enter the author ID:")? else {
        return Ok(());
    };
    let Some(genre_id) = prompt_id(prompter, "Enter the genre ID:")? else {
        return Ok(());
    };
    let year_input = prompter.line("Enter the published year:")?;
    let Some(published_year) = parse_year(&year_input) else {
        return Ok(());
    };

    let book = match NewBook::new(title.trim(), author_id, genre_id, published_year) {
        Ok(book) => book,
        Err(err) => {
            report_validation(err);
            return Ok(());
        }
    };

    if let Some(added) = report(CatalogRepo::new(pool).add(book).await) {
        println!(
            "\nBook '{}' (ID: {}) added successfully.\n",
            added.title, added.book_id
        );
    }
    Ok(())
}

pub async fn remove_book(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    let Some(book_id) = prompt_id(prompter, "Enter the ID of the book to remove:")? else {
        return Ok(());
    };

    let repo = CatalogRepo::new(pool);
    let Some(book) = report(repo.get(book_id).await) else {
        return Ok(());
    };

    println!("\n{}", render::book_table(std::slice::from_ref(&book)));
    if !prompter.confirm("Are you sure you want to remove this book?")? {
        println!("\nOperation cancelled.\n");
        return Ok(());
    }

    if report(repo.remove(book_id).await).is_some() {
        println!("\nBook with ID {book_id} removed successfully.\n");
    }
    Ok(())
}

pub async fn modify_book(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    let Some(book_id) = prompt_id(prompter, "Enter the ID of the book to modify:")? else {
        return Ok(());
    };

    let repo = CatalogRepo::new(pool);
    let Some(current) = report(repo.get_row(book_id).await) else {
        return Ok(());
    };
    let Some(listing) = report(repo.get(book_id).await) else {
        return Ok(());
    };

    println!("\n{}", render::book_table(std::slice::from_ref(&listing)));
    if !prompter.confirm("Do you want to modify this book?")? {
        println!("\nOperation cancelled.\n");
        return Ok(());
    }

    println!("\nEnter the data you want to change, leave blank for no change.\n");
    let title = prompter.line_with_default("Title:", &current.title)?;
    let author_input =
        prompter.line_with_default("Author ID:", &current.author_id.to_string())?;
    let Some(author_id) = parse_id(&author_input) else {
        return Ok(());
    };
    let genre_input = prompter.line_with_default("Genre ID:", &current.genre_id.to_string())?;
    let Some(genre_id) = parse_id(&genre_input) else {
        return Ok(());
    };
    let year_input =
        prompter.line_with_default("Published year:", &current.published_year.to_string())?;
    let Some(published_year) = parse_year(&year_input) else {
        return Ok(());
    };

    let update = BookUpdate {
        title: title.trim().to_owned(),
        author_id,
        genre_id,
        published_year,
    };

    if let Some(updated) = report(repo.update(book_id, update).await) {
        println!("\nBook updated successfully. Here are the updated details:\n");
        println!("{}", render::book_table(std::slice::from_ref(&updated)));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Borrowers

pub async fn list_borrowers(pool: &SqlitePool) -> Result<()> {
    let Some(borrowers) = report(BorrowerRepo::new(pool).list().await) else {
        return Ok(());
    };

    if borrowers.is_empty() {
        println!("\nNo borrowers are currently registered.\n");
        return Ok(());
    }

    println!("\n{}", render::borrower_table(&borrowers));
    println!("Total number of borrowers: {}\n", borrowers.len());
    Ok(())
}

pub async fn search_borrowers(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    let keyword = prompter.line("Enter a keyword to search for:")?;
    let keyword = keyword.trim();
    if keyword.is_empty() {
        println!("\nNo keyword entered. Please try again.\n");
        return Ok(());
    }

    let Some(borrowers) = report(BorrowerRepo::new(pool).search(keyword).await) else {
        return Ok(());
    };

    if borrowers.is_empty() {
        println!("\nNo borrowers found matching the keyword: '{keyword}'\n");
        return Ok(());
    }

    println!("\n{}", render::borrower_table(&borrowers));
    println!("Total number of borrowers found: {}\n", borrowers.len());
    Ok(())
}

pub async fn add_borrower(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    let name = prompter.line("Enter the borrower's name:")?;
    let email = prompter.line("Enter the borrower's email:")?;
    let phone = prompter.line("Enter the borrower's phone number:")?;

    let borrower = match NewBorrower::new(name.trim(), email.trim(), phone.trim()) {
        Ok(borrower) => borrower,
        Err(err) => {
            report_validation(err);
            return Ok(());
        }
    };

    if let Some(added) = report(BorrowerRepo::new(pool).add(borrower).await) {
        println!(
            "\nBorrower '{}' (ID: {}) added successfully.\n",
            added.name, added.borrower_id
        );
    }
    Ok(())
}

pub async fn remove_borrower(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    let Some(borrower_id) = prompt_id(prompter, "Enter the ID of the borrower to remove:")?
    else {
        return Ok(());
    };

    let repo = BorrowerRepo::new(pool);
    let Some(borrower) = report(repo.get(borrower_id).await) else {
        return Ok(());
    };

    // Refuse before asking for confirmation when loans are still open.
    let Some(open) = report(repo.active_loan_count(borrower_id).await) else {
        return Ok(());
    };
    if open > 0 {
        let err = ShelfError::ActiveLoans {
            name: borrower.name,
            count: open,
        };
        println!("\nError: {err}\n");
        return Ok(());
    }

    println!(
        "\nBorrower: {} ({} / {})",
        borrower.name, borrower.email, borrower.phone
    );
    if !prompter.confirm("Are you sure you want to remove this borrower?")? {
        println!("\nOperation cancelled.\n");
        return Ok(());
    }

    if report(repo.remove(borrower_id).await).is_some() {
        println!("\nBorrower with ID {borrower_id} removed successfully.\n");
    }
    Ok(())
}

pub async fn modify_borrower(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    let Some(borrower_id) = prompt_id(prompter, "Enter the ID of the borrower to modify:")?
    else {
        return Ok(());
    };

    let repo = BorrowerRepo::new(pool);
    let Some(current) = report(repo.get(borrower_id).await) else {
        return Ok(());
    };

    println!(
        "\nBorrower: {} ({} / {})",
        current.name, current.email, current.phone
    );
    if !prompter.confirm("Do you want to modify this borrower?")? {
        println!("\nOperation cancelled.\n");
        return Ok(());
    }

    println!("\nEnter the data you want to change, leave blank for no change.\n");
    let name = prompter.line_with_default("Name:", &current.name)?;
    let email = prompter.line_with_default("Email:", &current.email)?;
    let phone = prompter.line_with_default("Phone:", &current.phone)?;

    let borrower = match NewBorrower::new(name.trim(), email.trim(), phone.trim()) {
        Ok(borrower) => borrower,
        Err(err) => {
            report_validation(err);
            return Ok(());
        }
    };

    if let Some(updated) = report(repo.update(borrower_id, borrower).await) {
        println!(
            "\nBorrower updated successfully: {} ({} / {})\n",
            updated.name, updated.email, updated.phone
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Loans

pub async fn list_loans(pool: &SqlitePool) -> Result<()> {
    let Some(loans) = report(LoanRepo::new(pool).list().await) else {
        return Ok(());
    };

    if loans.is_empty() {
        println!("\nNo loans are currently recorded.\n");
        return Ok(());
    }

    println!("\n{}", render::loan_table(&loans));
    println!("Total number of loans: {}\n", loans.len());
    Ok(())
}

pub async fn search_loans(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    let keyword = prompter.line("Enter a keyword to search for:")?;
    let keyword = keyword.trim();
    if keyword.is_empty() {
        println!("\nNo keyword entered. Please try again.\n");
        return Ok(());
    }

    let Some(loans) = report(LoanRepo::new(pool).search(keyword).await) else {
        return Ok(());
    };

    if loans.is_empty() {
        println!("\nNo loans found matching the keyword: '{keyword}'\n");
        return Ok(());
    }

    println!("\n{}", render::loan_table(&loans));
    println!("Total number of loans found: {}\n", loans.len());
    Ok(())
}

pub async fn borrow_book(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    let Some(book_id) = prompt_id(prompter, "Enter the ID of the book to borrow:")? else {
        return Ok(());
    };
    let Some(borrower_id) = prompt_id(prompter, "Enter the ID of the borrower:")? else {
        return Ok(());
    };

    if let Some(loan) = report(LoanRepo::new(pool).borrow(book_id, borrower_id).await) {
        println!(
            "\nBook '{}' loaned to {} on {} (loan ID: {}).\n",
            loan.book_title, loan.borrower_name, loan.loan_date, loan.loan_id
        );
    }
    Ok(())
}

pub async fn return_book(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    let Some(loan_id) = prompt_id(prompter, "Enter the ID of the loan to close:")? else {
        return Ok(());
    };

    if let Some(loan) = report(LoanRepo::new(pool).return_loan(loan_id).await) {
        println!(
            "\nBook '{}' returned by {} on {}.\n",
            loan.book_title,
            loan.borrower_name,
            render::optional_date(loan.return_date)
        );
    }
    Ok(())
}

pub async fn modify_loan(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    let Some(loan_id) = prompt_id(prompter, "Enter the ID of the loan to modify:")? else {
        return Ok(());
    };

    let repo = LoanRepo::new(pool);
    let Some(loan) = report(repo.get(loan_id).await) else {
        return Ok(());
    };

    println!("\n{}", render::loan_table(std::slice::from_ref(&loan)));
    if loan.status() == LoanStatus::Active {
        let err = ShelfError::LoanStillActive { loan_id };
        println!("\nError: {err}\n");
        return Ok(());
    }

    if !prompter.confirm("Do you want to modify this loan's return date?")? {
        println!("\nOperation cancelled.\n");
        return Ok(());
    }

    let current = render::optional_date(loan.return_date);
    let input = prompter.line_with_default("New return date (YYYY-MM-DD):", &current)?;
    let Some(new_date) = parse_date(&input) else {
        return Ok(());
    };

    if let Some(updated) = report(repo.modify(loan_id, new_date).await) {
        println!("\nLoan return date updated successfully.\n");
        println!("{}", render::loan_table(std::slice::from_ref(&updated)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use chrono::Local;
    use shelfctl_core::models::Availability;
    use shelfctl_db::{migrations, pool::create_pool_with_options};

    async fn memory_pool() -> SqlitePool {
        // Each sqlite :memory: connection is its own database, so the pool
        // is capped at one connection.
        let pool = create_pool_with_options("sqlite::memory:", 1).await.unwrap();
        migrations::run(&pool).await.unwrap();
        pool
    }

    async fn seed_author_genre(pool: &SqlitePool) {
        sqlx::query("INSERT INTO authors (name) VALUES ('Sample Author')")
            .execute(pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO genres (name) VALUES ('Sample Genre')")
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn add_book_flow_inserts_and_trims_title() {
        let pool = memory_pool().await;
        seed_author_genre(&pool).await;

        let mut prompter = ScriptedPrompter::new(&["  Dune ", "1", "1", "1965"], &[]);
        add_book(&pool, &mut prompter).await.unwrap();

        let books = CatalogRepo::new(&pool).list().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].availability, Availability::Available);
    }

    #[tokio::test]
    async fn add_book_flow_rejects_non_numeric_id_without_inserting() {
        let pool = memory_pool().await;
        seed_author_genre(&pool).await;

        let mut prompter = ScriptedPrompter::new(&["Dune", "abc"], &[]);
        add_book(&pool, &mut prompter).await.unwrap();

        assert!(CatalogRepo::new(&pool).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_book_flow_rejects_non_numeric_year_without_inserting() {
        let pool = memory_pool().await;
        seed_author_genre(&pool).await;

        let mut prompter = ScriptedPrompter::new(&["Dune", "1", "1", "next year"], &[]);
        add_book(&pool, &mut prompter).await.unwrap();

        assert!(CatalogRepo::new(&pool).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn modify_book_flow_keeps_fields_left_blank() {
        let pool = memory_pool().await;
        seed_author_genre(&pool).await;

        let repo = CatalogRepo::new(&pool);
        let added = repo
            .add(NewBook::new("Dune", 1, 1, 1965).unwrap())
            .await
            .unwrap();

        // Confirm, change only the year, leave the rest blank.
        let mut prompter = ScriptedPrompter::new(
            &[&added.book_id.to_string(), "", "", "", "1966"],
            &[true],
        );
        modify_book(&pool, &mut prompter).await.unwrap();

        let after = repo.get(added.book_id).await.unwrap();
        assert_eq!(after.title, "Dune");
        assert_eq!(after.published_year, 1966);
    }

    #[tokio::test]
    async fn remove_book_flow_honours_declined_confirmation() {
        let pool = memory_pool().await;
        seed_author_genre(&pool).await;

        let repo = CatalogRepo::new(&pool);
        let added = repo
            .add(NewBook::new("Dune", 1, 1, 1965).unwrap())
            .await
            .unwrap();

        let mut prompter = ScriptedPrompter::new(&[&added.book_id.to_string()], &[false]);
        remove_book(&pool, &mut prompter).await.unwrap();
        assert!(repo.get(added.book_id).await.is_ok());

        let mut prompter = ScriptedPrompter::new(&[&added.book_id.to_string()], &[true]);
        remove_book(&pool, &mut prompter).await.unwrap();
        assert!(repo.get(added.book_id).await.is_err());
    }

    #[tokio::test]
    async fn add_borrower_flow_rejects_invalid_email() {
        let pool = memory_pool().await;

        let mut prompter =
            ScriptedPrompter::new(&["John", "not-an-email", "123456789"], &[]);
        add_borrower(&pool, &mut prompter).await.unwrap();

        assert!(BorrowerRepo::new(&pool).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_borrower_flow_refuses_before_confirmation_when_loans_open() {
        let pool = memory_pool().await;
        seed_author_genre(&pool).await;

        let borrowers = BorrowerRepo::new(&pool);
        let borrower = borrowers
            .add(NewBorrower::new("John", "john.doe@example.com", "123456789").unwrap())
            .await
            .unwrap();
        let book = CatalogRepo::new(&pool)
            .add(NewBook::new("Dune", 1, 1, 1965).unwrap())
            .await
            .unwrap();
        LoanRepo::new(&pool)
            .borrow(book.book_id, borrower.borrower_id)
            .await
            .unwrap();

        // A confirmation is scripted but must never be consumed.
        let mut prompter =
            ScriptedPrompter::new(&[&borrower.borrower_id.to_string()], &[true]);
        remove_borrower(&pool, &mut prompter).await.unwrap();

        assert_eq!(prompter.remaining_confirms(), 1);
        assert!(borrowers.get(borrower.borrower_id).await.is_ok());
    }

    #[tokio::test]
    async fn modify_loan_flow_rejects_early_date_and_leaves_row_unchanged() {
        let pool = memory_pool().await;
        seed_author_genre(&pool).await;

        let borrower = BorrowerRepo::new(&pool)
            .add(NewBorrower::new("John", "john.doe@example.com", "123456789").unwrap())
            .await
            .unwrap();
        let book = CatalogRepo::new(&pool)
            .add(NewBook::new("Dune", 1, 1, 1965).unwrap())
            .await
            .unwrap();
        let loans = LoanRepo::new(&pool);
        let loan = loans
            .borrow(book.book_id, borrower.borrower_id)
            .await
            .unwrap();
        loans.return_loan(loan.loan_id).await.unwrap();

        let early = loan.loan_date.pred_opt().unwrap().to_string();
        let mut prompter =
            ScriptedPrompter::new(&[&loan.loan_id.to_string(), &early], &[true]);
        modify_loan(&pool, &mut prompter).await.unwrap();

        let stored = loans.get(loan.loan_id).await.unwrap();
        assert_eq!(stored.return_date, Some(Local::now().date_naive()));
    }

    #[tokio::test]
    async fn borrow_and_return_flows_track_availability() {
        let pool = memory_pool().await;
        seed_author_genre(&pool).await;

        let borrower = BorrowerRepo::new(&pool)
            .add(NewBorrower::new("John", "john.doe@example.com", "123456789").unwrap())
            .await
            .unwrap();
        let catalog = CatalogRepo::new(&pool);
        let book = catalog
            .add(NewBook::new("Dune", 1, 1, 1965).unwrap())
            .await
            .unwrap();

        let mut prompter = ScriptedPrompter::new(
            &[&book.book_id.to_string(), &borrower.borrower_id.to_string()],
            &[],
        );
        borrow_book(&pool, &mut prompter).await.unwrap();
        assert_eq!(
            catalog.get(book.book_id).await.unwrap().availability,
            Availability::Borrowed
        );

        let loan = LoanRepo::new(&pool).list().await.unwrap().remove(0);
        let mut prompter = ScriptedPrompter::new(&[&loan.loan_id.to_string()], &[]);
        return_book(&pool, &mut prompter).await.unwrap();
        assert_eq!(
            catalog.get(book.book_id).await.unwrap().availability,
            Availability::Available
        );
    }
}
