//! Porcelain commands (user-facing version control operations)
//!
//! Each command is an inherent method on `Repository` returning `dvc::Result`.
//! Output formatting is left to the binary.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files and removals
//! - `commit`: Record the staged changes
//! - `branch`: Create or list branches
//! - `checkout`: Switch branches or detach HEAD
//! - `merge`: Three-way merge of a branch into HEAD
//! - `log`: Show commit history
//! - `diff`: Compare two commits
//! - `clone`: Copy a repository to a new directory

pub mod add;
pub mod branch;
pub mod checkout;
pub mod clone;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod merge;
