//! A small version control system for data files
//!
//! Files are stored as content-addressed blobs; a commit records a flat snapshot
//! (path → blob id) plus its parent commits. Branches are named pointers into the
//! commit graph, and branches are combined with a three-way merge against their
//! lowest common ancestor.
//!
//! ```rust,ignore
//! use dvc::{Repository, RepositoryConfig};
//!
//! let repository = Repository::init("data-project", RepositoryConfig::default())?;
//! repository.add("data-project/measurements.csv")?;
//! let first = repository.commit("initial measurements")?;
//! ```

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;

pub use areas::repository::Repository;
pub use config::RepositoryConfig;
pub use errors::{DvcError, Result};
