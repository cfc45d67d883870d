//! Stored object types
//!
//! Everything the repository persists in its object database is one of:
//!
//! - **Blob**: file content (raw bytes)
//! - **Tree**: flat snapshot of tracked paths and their blob ids
//! - **Commit**: tree id, parent commit ids, author and message
//!
//! All objects serialize as `<type> <size>\0<payload>`; the SHA-1 of that byte string
//! is the object's id.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
