//! Repository configuration
//!
//! Author identity and the name of the branch HEAD points at after `init`.
//! Values come from the environment when running the binary, or are passed
//! explicitly by library callers that need reproducible commits.

use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use derive_new::new;

pub const DEFAULT_BRANCH: &str = "main";
const DEFAULT_AUTHOR_NAME: &str = "dvc";
const DEFAULT_AUTHOR_EMAIL: &str = "dvc@localhost";

const AUTHOR_NAME_VAR: &str = "DVC_AUTHOR_NAME";
const AUTHOR_EMAIL_VAR: &str = "DVC_AUTHOR_EMAIL";
const AUTHOR_DATE_VAR: &str = "DVC_AUTHOR_DATE";

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct RepositoryConfig {
    pub author_name: String,
    pub author_email: String,
    /// Pinned commit timestamp; the current time is used when absent
    pub author_date: Option<DateTime<FixedOffset>>,
    pub default_branch: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            author_name: DEFAULT_AUTHOR_NAME.to_string(),
            author_email: DEFAULT_AUTHOR_EMAIL.to_string(),
            author_date: None,
            default_branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

impl RepositoryConfig {
    /// Load configuration from `DVC_AUTHOR_NAME`, `DVC_AUTHOR_EMAIL` and `DVC_AUTHOR_DATE`
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let author_name = std::env::var(AUTHOR_NAME_VAR).unwrap_or(defaults.author_name);
        let author_email = std::env::var(AUTHOR_EMAIL_VAR).unwrap_or(defaults.author_email);
        let author_date = match std::env::var(AUTHOR_DATE_VAR) {
            Ok(date) => Some(
                parse_author_date(&date)
                    .with_context(|| format!("{AUTHOR_DATE_VAR} has an invalid date: {date}"))?,
            ),
            Err(_) => None,
        };

        Ok(RepositoryConfig {
            author_name,
            author_email,
            author_date,
            default_branch: defaults.default_branch,
        })
    }

    pub fn with_author_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.author_date = Some(date);
        self
    }
}

/// Accepts RFC 2822 dates as well as `%Y-%m-%d %H:%M:%S %z`
pub fn parse_author_date(date: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(date)
        .or_else(|_| DateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S %z"))
        .context("unsupported date format")
}
