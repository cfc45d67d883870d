//! Switching the working directory between snapshots

pub mod migration;
