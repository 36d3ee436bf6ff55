//! Database target selection.
//!
//! The library crates only consume a ready pool; choosing between the
//! production and test databases happens here, from the `--db` flag and
//! environment variables (loaded from `.env` via dotenvy in `main`).

use clap::ValueEnum;

/// Which database the session operates on.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DbTarget {
    /// The real catalog (SHELFCTL_DATABASE_URL)
    #[default]
    Production,
    /// A scratch database for trying things out (SHELFCTL_TEST_DATABASE_URL)
    Test,
}

impl DbTarget {
    fn env_var(self) -> &'static str {
        match self {
            Self::Production => "SHELFCTL_DATABASE_URL",
            Self::Test => "SHELFCTL_TEST_DATABASE_URL",
        }
    }

    fn default_file(self) -> &'static str {
        match self {
            Self::Production => "shelfctl.db",
            Self::Test => "shelfctl-test.db",
        }
    }
}

/// Resolve the connection URL: explicit override, then the target's
/// environment variable, then a file next to the working directory.
pub fn resolve_database_url(target: DbTarget, override_url: Option<String>) -> String {
    if let Some(url) = override_url {
        return url;
    }

    std::env::var(target.env_var())
        .unwrap_or_else(|_| format!("sqlite://{}", target.default_file()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins() {
        let url = resolve_database_url(
            DbTarget::Production,
            Some("sqlite://elsewhere.db".to_owned()),
        );
        assert_eq!(url, "sqlite://elsewhere.db");
    }

    #[test]
    fn falls_back_to_default_file() {
        // Neither env var is set in the test environment
        std::env::remove_var("SHELFCTL_TEST_DATABASE_URL");
        let url = resolve_database_url(DbTarget::Test, None);
        assert_eq!(url, "sqlite://shelfctl-test.db");
    }
}
