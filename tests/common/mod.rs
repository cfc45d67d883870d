#![allow(dead_code)]

pub mod command;
pub mod file;

use dvc::{Repository, RepositoryConfig};
use std::path::Path;

pub const AUTHOR_NAME: &str = "fake_user";
pub const AUTHOR_EMAIL: &str = "fake_email@email.com";
pub const AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000";

/// Configuration with a pinned author so commit ids are reproducible
pub fn test_config() -> RepositoryConfig {
    let date = dvc::config::parse_author_date(AUTHOR_DATE).expect("valid test date");

    RepositoryConfig {
        author_name: AUTHOR_NAME.to_string(),
        author_email: AUTHOR_EMAIL.to_string(),
        ..RepositoryConfig::default()
    }
    .with_author_date(date)
}

pub fn init_repository(dir: &Path) -> Repository {
    Repository::init(dir, test_config()).expect("Failed to init repository")
}

pub fn open_repository(dir: &Path) -> Repository {
    Repository::open(dir, test_config()).expect("Failed to open repository")
}

/// Stage a single repository-relative path
pub fn stage(repository: &Repository, relative_path: &str) {
    repository
        .add(repository.path().join(relative_path))
        .unwrap_or_else(|e| panic!("Failed to add {relative_path}: {e}"));
}
