//! Staging area
//!
//! Records the changes that the next commit will apply on top of the HEAD tree:
//! paths staged with new content (path → blob id) and tracked paths staged for
//! removal. The index is persisted between invocations and cleared once a commit
//! succeeds.
//!
//! ## Index File Format
//!
//! ```text
//! <blob-id> <path>        one line per staged file, sorted by path
//! - <path>                one line per staged removal
//! checksum <sha1>         SHA-1 of every preceding byte
//! ```
//!
//! An empty file is an empty staging area. A missing or mismatching checksum means
//! the file was truncated or edited by hand and is reported as corruption.

use crate::areas::refs::lock_path;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{Context, anyhow};
use file_guard::Lock;
use sha1::{Digest, Sha1};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::Path;

const CHECKSUM_PREFIX: &str = "checksum ";
const REMOVAL_PREFIX: &str = "- ";

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.dvc/index`)
    path: Box<Path>,
    entries: BTreeMap<String, ObjectId>,
    removals: BTreeSet<String>,
    /// Set when the in-memory state differs from what was loaded
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            removals: BTreeSet::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index from disk, replacing any in-memory state
    ///
    /// Acquires a shared lock on the index file while reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.removals.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(&self.path)
            .with_context(|| format!("unable to open index file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, Lock::Shared, 0, 1)?;

        let mut content = String::new();
        lock.deref_mut().read_to_string(&mut content)?;

        if content.is_empty() {
            return Ok(());
        }

        let body = Self::verify_checksum(&content)?;
        for line in body.lines() {
            self.parse_line(line)?;
        }

        Ok(())
    }

    fn verify_checksum(content: &str) -> anyhow::Result<&str> {
        let checksum_start = content
            .rfind(CHECKSUM_PREFIX)
            .ok_or_else(|| anyhow!("corrupt index file: missing checksum"))?;
        let (body, checksum_line) = content.split_at(checksum_start);
        let expected = checksum_line[CHECKSUM_PREFIX.len()..].trim();

        if Self::checksum(body) != expected {
            return Err(anyhow!("corrupt index file: checksum does not match"));
        }

        Ok(body)
    }

    fn parse_line(&mut self, line: &str) -> anyhow::Result<()> {
        if let Some(path) = line.strip_prefix(REMOVAL_PREFIX) {
            self.removals.insert(path.to_string());
            return Ok(());
        }

        let (oid, path) = line
            .split_once(' ')
            .ok_or_else(|| anyhow!("corrupt index file: malformed entry '{line}'"))?;
        self.entries
            .insert(path.to_string(), ObjectId::try_parse(oid)?);

        Ok(())
    }

    fn checksum(body: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(body.as_bytes());
        ObjectId::from_digest(&hasher.finalize()).to_string()
    }

    /// Stage `path` with the given blob, overriding a pending removal
    pub fn stage(&mut self, path: impl Into<String>, oid: ObjectId) {
        let path = path.into();
        self.removals.remove(&path);
        self.entries.insert(path, oid);
        self.changed = true;
    }

    /// Stage the removal of a tracked path
    pub fn stage_removal(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.entries.remove(&path);
        self.removals.insert(path);
        self.changed = true;
    }

    pub fn entries(&self) -> &BTreeMap<String, ObjectId> {
        &self.entries
    }

    pub fn removals(&self) -> &BTreeSet<String> {
        &self.removals
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.removals.is_empty()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn clear(&mut self) {
        self.changed |= !self.is_empty();
        self.entries.clear();
        self.removals.clear();
    }

    /// Persist the staging area
    ///
    /// The new content goes to a sibling temp file which replaces the index in a
    /// single rename, taken while holding an exclusive lock on the current index.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .with_context(|| format!("unable to open index file {}", self.path.display()))?;
        let _lock = file_guard::lock(&mut index_file, Lock::Exclusive, 0, 1)?;

        let temp_path = lock_path(&self.path);
        let mut temp_file = std::fs::File::create(&temp_path)
            .with_context(|| format!("unable to create {}", temp_path.display()))?;
        temp_file.write_all(self.serialize().as_bytes())?;
        temp_file.sync_all()?;

        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("unable to replace index file {}", self.path.display()))?;

        self.changed = false;

        Ok(())
    }

    fn serialize(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut body = String::new();
        for (path, oid) in &self.entries {
            body.push_str(&format!("{oid} {path}\n"));
        }
        for path in &self.removals {
            body.push_str(&format!("{REMOVAL_PREFIX}{path}\n"));
        }

        let checksum = Self::checksum(&body);
        format!("{body}{CHECKSUM_PREFIX}{checksum}\n")
    }
}
