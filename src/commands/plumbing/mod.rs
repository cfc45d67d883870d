//! Plumbing commands (low-level object access)
//!
//! - `hash_object`: compute, and optionally store, the blob id of a file
//! - `cat_file`: load any object by id

pub mod cat_file;
pub mod hash_object;
