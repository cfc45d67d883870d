//! Data structures and algorithms
//!
//! - `branch`: branch name validation
//! - `checkout`: planning working directory migrations between snapshots
//! - `diff`: path-level comparison of trees
//! - `ignore`: `.dvcignore` matching
//! - `log`: commit history traversal
//! - `merge`: common ancestor search and three-way resolution
//! - `objects`: stored object types (blob, tree, commit)

pub mod branch;
pub mod checkout;
pub mod diff;
pub mod ignore;
pub mod log;
pub mod merge;
pub mod objects;
