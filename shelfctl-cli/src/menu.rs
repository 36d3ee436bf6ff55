//! Menu loop: a main menu with one submenu per management area.
//!
//! Selections route to `flows`; Esc or Ctrl-C at any menu walks back up
//! (and out of the program from the main menu) instead of erroring.

use anyhow::Result;
use inquire::{InquireError, Select};
use sqlx::SqlitePool;

use crate::flows;
use crate::prompt::Prompter;

const MAIN_CHOICES: &[&str] = &["Manage Books", "Manage Borrowers", "Manage Loans", "Exit"];

const BOOK_CHOICES: &[&str] = &[
    "View All Books",
    "Search for Books",
    "Add a Book",
    "Remove a Book",
    "Modify a Book",
    "Back to Main Menu",
];

const BORROWER_CHOICES: &[&str] = &[
    "View All Borrowers",
    "Search for Borrowers",
    "Add a Borrower",
    "Remove a Borrower",
    "Modify a Borrower",
    "Back to Main Menu",
];

const LOAN_CHOICES: &[&str] = &[
    "View All Loans",
    "Search for Loans",
    "Borrow a Book",
    "Return a Book",
    "Modify a Loan",
    "Back to Main Menu",
];

/// None when the user backed out with Esc or Ctrl-C.
fn select(message: &str, choices: &[&'static str]) -> Result<Option<&'static str>> {
    match Select::new(message, choices.to_vec()).prompt() {
        Ok(choice) => Ok(Some(choice)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub async fn run(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    loop {
        let Some(choice) = select("Library Management System", MAIN_CHOICES)? else {
            break;
        };
        match choice {
            "Manage Books" => book_menu(pool, prompter).await?,
            "Manage Borrowers" => borrower_menu(pool, prompter).await?,
            "Manage Loans" => loan_menu(pool, prompter).await?,
            _ => break,
        }
    }

    println!("\nThank you for using the Library Management System. Goodbye!\n");
    Ok(())
}

async fn book_menu(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    loop {
        let Some(choice) = select("Manage Books", BOOK_CHOICES)? else {
            return Ok(());
        };
        match choice {
            "View All Books" => flows::list_books(pool).await?,
            "Search for Books" => flows::search_books(pool, prompter).await?,
            "Add a Book" => flows::add_book(pool, prompter).await?,
            "Remove a Book" => flows::remove_book(pool, prompter).await?,
            "Modify a Book" => flows::modify_book(pool, prompter).await?,
            _ => return Ok(()),
        }
    }
}

async fn borrower_menu(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    loop {
        let Some(choice) = select("Manage Borrowers", BORROWER_CHOICES)? else {
            return Ok(());
        };
        match choice {
            "View All Borrowers" => flows::list_borrowers(pool).await?,
            "Search for Borrowers" => flows::search_borrowers(pool, prompter).await?,
            "Add a Borrower" => flows::add_borrower(pool, prompter).await?,
            "Remove a Borrower" => flows::remove_borrower(pool, prompter).await?,
            "Modify a Borrower" => flows::modify_borrower(pool, prompter).await?,
            _ => return Ok(()),
        }
    }
}

async fn loan_menu(pool: &SqlitePool, prompter: &mut dyn Prompter) -> Result<()> {
    loop {
        let Some(choice) = select("Manage Loans", LOAN_CHOICES)? else {
            return Ok(());
        };
        match choice {
            "View All Loans" => flows::list_loans(pool).await?,
            "Search for Loans" => flows::search_loans(pool, prompter).await?,
            "Borrow a Book" => flows::borrow_book(pool, prompter).await?,
            "Return a Book" => flows::return_book(pool, prompter).await?,
            "Modify a Loan" => flows::modify_loan(pool, prompter).await?,
            _ => return Ok(()),
        }
    }
}
