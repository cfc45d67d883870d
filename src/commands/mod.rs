//! Command implementations
//!
//! Commands are organized into two categories:
//!
//! - `plumbing`: low-level object access (hash-object, cat-file)
//! - `porcelain`: version control workflows (add, commit, merge, ...)
//!
//! Both extend `Repository` with inherent methods.

pub mod plumbing;
pub mod porcelain;
