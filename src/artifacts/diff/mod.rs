//! Snapshot comparison
//!
//! Trees are flat path → blob maps, so comparing two snapshots is a single merge
//! walk over their sorted entries. Content-level diffs are not produced.

pub mod tree_diff;
