//! Plain-text table rendering for listings.
//!
//! Columns are padded to the widest cell with a two-space gutter and a
//! dashed rule under the header row. No terminal styling; output has to
//! stay greppable in scripts and readable in test assertions.

use chrono::NaiveDate;

use shelfctl_core::models::{BookListing, BorrowerListing, LoanListing};

/// Column-aligned text table.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| (*h).to_owned()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                if len > widths[i] {
                    widths[i] = len;
                }
            }
        }

        let mut out = String::new();
        render_line(&mut out, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        render_line(&mut out, &rule, &widths);
        for row in &self.rows {
            render_line(&mut out, row, &widths);
        }
        out
    }
}

fn render_line(out: &mut String, cells: &[String], widths: &[usize]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(cell);
        if i < cells.len() - 1 {
            let pad = widths[i].saturating_sub(cell.chars().count());
            for _ in 0..pad {
                out.push(' ');
            }
        }
    }
    out.push('\n');
}

/// Empty string for an open loan, ISO date otherwise.
pub fn optional_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.to_string(),
        None => String::new(),
    }
}

pub fn book_table(books: &[BookListing]) -> String {
    let mut table = Table::new(&["ID", "Title", "Author", "Genre", "Year", "Availability"]);
    for book in books {
        table.row(vec![
            book.book_id.to_string(),
            book.title.clone(),
            book.author.clone(),
            book.genre.clone(),
            book.published_year.to_string(),
            book.availability.to_string(),
        ]);
    }
    table.render()
}

pub fn borrower_table(borrowers: &[BorrowerListing]) -> String {
    let mut table = Table::new(&["ID", "Name", "Email", "Phone", "Books Borrowed"]);
    for borrower in borrowers {
        table.row(vec![
            borrower.borrower_id.to_string(),
            borrower.name.clone(),
            borrower.email.clone(),
            borrower.phone.clone(),
            borrower.books_borrowed.to_string(),
        ]);
    }
    table.render()
}

pub fn loan_table(loans: &[LoanListing]) -> String {
    let mut table = Table::new(&["Loan ID", "Book Title", "Borrower", "Loan Date", "Return Date"]);
    for loan in loans {
        table.row(vec![
            loan.loan_id.to_string(),
            loan.book_title.clone(),
            loan.borrower_name.clone(),
            loan.loan_date.to_string(),
            optional_date(loan.return_date),
        ]);
    }
    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfctl_core::models::Availability;

    #[test]
    fn columns_align_to_widest_cell() {
        let mut table = Table::new(&["ID", "Title"]);
        table.row(vec!["1".to_owned(), "Short".to_owned()]);
        table.row(vec!["12".to_owned(), "A Much Longer Title".to_owned()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "ID  Title");
        // The rule spans the widest cell in each column, not just the header
        assert_eq!(lines[1], "--  -------------------");
        assert_eq!(lines[2], "1   Short");
        assert_eq!(lines[3], "12  A Much Longer Title");
    }

    #[test]
    fn open_loan_renders_blank_return_date() {
        assert_eq!(optional_date(None), "");
        let date = NaiveDate::from_ymd_opt(2024, 5, 8).unwrap();
        assert_eq!(optional_date(Some(date)), "2024-05-08");
    }

    #[test]
    fn book_table_shows_availability_label() {
        let books = vec![BookListing {
            book_id: 1,
            title: "Dune".to_owned(),
            author: "Frank Herbert".to_owned(),
            genre: "Science Fiction".to_owned(),
            published_year: 1965,
            availability: Availability::Borrowed,
        }];
        let rendered = book_table(&books);
        assert!(rendered.contains("Borrowed"));
        assert!(rendered.contains("Frank Herbert"));
    }
}
