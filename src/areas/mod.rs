//! Persistent repository areas
//!
//! - `database`: content-addressed object store for blobs, trees and commits
//! - `index`: staging area recording the changes of the next commit
//! - `refs`: branch references and HEAD
//! - `repository`: handle tying the areas of one repository together
//! - `workspace`: working directory file access

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
