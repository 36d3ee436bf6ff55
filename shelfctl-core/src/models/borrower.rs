//! Borrower fields and rows.
//!
//! Name, email, and phone are validated newtypes: constructing them is the
//! only way to get a `NewBorrower`, so the repository never sees a malformed
//! field.

use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::prelude::FromRow;

use super::ValidationError;

/// Loose email shape check: something before and after '@', a dot in the
/// domain part. Matches the historical behavior of this tool rather than
/// full RFC 5322.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("invalid email regex"));

/// Validated borrower name (letters only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowerName(String);

impl BorrowerName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if !s.chars().all(char::is_alphabetic) {
            return Err(ValidationError::InvalidFormat {
                field: "name",
                reason: "must contain only letters",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if !EMAIL_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "invalid email format",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated phone number (digits only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone(String);

impl Phone {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "phone" });
        }
        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidFormat {
                field: "phone",
                reason: "must contain only digits",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Input for borrower insertion, field-validated on construction.
#[derive(Debug, Clone)]
pub struct NewBorrower {
    pub name: BorrowerName,
    pub email: Email,
    pub phone: Phone,
}

impl NewBorrower {
    pub fn new(name: &str, email: &str, phone: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: BorrowerName::new(name)?,
            email: Email::new(email)?,
            phone: Phone::new(phone)?,
        })
    }
}

/// Borrower record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct Borrower {
    pub borrower_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Borrower with computed loan count for list display.
#[derive(Debug, Clone)]
pub struct BorrowerListing {
    pub borrower_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub books_borrowed: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_name() {
        assert!(BorrowerName::new("Alice").is_ok());
        assert!(BorrowerName::new("Élodie").is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        let err = BorrowerName::new("").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "name" }));
    }

    #[test]
    fn rejects_non_alphabetic_name() {
        let err = BorrowerName::new("Alice2").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
        assert!(BorrowerName::new("Mary Ann").is_err()); // space is not a letter
    }

    #[test]
    fn valid_email() {
        assert!(Email::new("a@b.co").is_ok());
        assert!(Email::new("john.doe@example.com").is_ok());
    }

    #[test]
    fn rejects_bad_email() {
        assert!(Email::new("not-an-email").is_err());
        assert!(Email::new("a@b").is_err()); // no dot in domain
        assert!(Email::new("a@@b.co").is_err());
        assert!(Email::new("").is_err());
    }

    #[test]
    fn valid_phone() {
        assert!(Phone::new("123456789").is_ok());
    }

    #[test]
    fn rejects_bad_phone() {
        assert!(Phone::new("12-34").is_err());
        assert!(Phone::new("phone").is_err());
        assert!(Phone::new("").is_err());
    }

    #[test]
    fn new_borrower_collects_first_failure() {
        let err = NewBorrower::new("Alice", "bad", "123").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidFormat { field: "email", .. }
        ));
    }
}
