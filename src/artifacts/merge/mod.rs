//! Merge algorithms
//!
//! - `common_ancestor`: lowest common ancestor search and ancestry walks
//! - `resolve`: three-way tree merge against the common ancestor

pub mod common_ancestor;
pub mod resolve;
