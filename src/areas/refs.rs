//! Branch references and HEAD
//!
//! Branches are files under `refs/heads/` holding the id of their tip commit.
//! `HEAD` holds either `ref: refs/heads/<branch>` (attached) or a commit id
//! (detached). A branch whose ref file does not exist yet is *unborn*: this is the
//! state of the default branch between `init` and the first commit.
//!
//! Every ref write replaces the file in a single rename while holding an exclusive
//! lock on the previous version, so a ref always contains either its old or its new
//! value.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::DvcError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

pub const HEAD_REF_NAME: &str = "HEAD";

/// What `HEAD` points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Branch(BranchName),
    Detached(ObjectId),
}

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository metadata directory (typically `.dvc`)
    path: Box<Path>,
}

impl Refs {
    pub fn read_head_target(&self) -> anyhow::Result<Head> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;
        let content = content.trim();

        let symref = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        match symref {
            Some(symref) => Ok(Head::Branch(BranchName::try_parse_ref_path(&symref[1])?)),
            None => Ok(Head::Detached(ObjectId::try_parse(content)?)),
        }
    }

    /// Branch HEAD is attached to, `None` when detached
    pub fn current_branch(&self) -> anyhow::Result<Option<BranchName>> {
        match self.read_head_target()? {
            Head::Branch(branch_name) => Ok(Some(branch_name)),
            Head::Detached(_) => Ok(None),
        }
    }

    /// Commit HEAD resolves to, `None` on an unborn branch
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        match self.read_head_target()? {
            Head::Branch(branch_name) => self.read_branch(&branch_name),
            Head::Detached(oid) => Ok(Some(oid)),
        }
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.branch_path(branch_name).is_file()
    }

    /// Tip of a branch, `None` if the branch does not exist (or is unborn)
    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.branch_path(branch_name);
        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;

        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content)?))
    }

    pub fn create_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(branch_name) {
            return Err(DvcError::BranchExists(branch_name.to_string()).into());
        }

        self.write_ref_file(&self.branch_path(branch_name), oid.as_ref())?;
        log::debug!("created ref {} at {}", branch_name.ref_path(), oid);

        Ok(())
    }

    /// Move whatever HEAD points at (its branch, or HEAD itself when detached)
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        match self.read_head_target()? {
            Head::Branch(branch_name) => self.update_branch(&branch_name, oid),
            Head::Detached(_) => self.set_head(&Head::Detached(oid.clone())),
        }
    }

    pub fn update_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.write_ref_file(&self.branch_path(branch_name), oid.as_ref())?;
        log::debug!("updated ref {} to {}", branch_name.ref_path(), oid);

        Ok(())
    }

    pub fn set_head(&self, head: &Head) -> anyhow::Result<()> {
        let content = match head {
            Head::Branch(branch_name) => format!("ref: {}", branch_name.ref_path()),
            Head::Detached(oid) => oid.to_string(),
        };

        self.write_ref_file(&self.head_path(), &content)?;
        log::debug!("HEAD set to {}", content);

        Ok(())
    }

    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                BranchName::try_parse(name).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn write_ref_file(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .with_context(|| format!("invalid ref path {:?}", path))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent directories for {:?}", path))?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let _lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;

        let temp_path = lock_path(path);
        let mut temp_file = std::fs::File::create(&temp_path)
            .with_context(|| format!("failed to create {:?}", temp_path))?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.write_all(b"\n")?;
        temp_file.sync_all()?;

        std::fs::rename(&temp_path, path)
            .with_context(|| format!("failed to replace ref file at {:?}", path))?;

        Ok(())
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    fn branch_path(&self, branch_name: &BranchName) -> PathBuf {
        self.path.join(branch_name.ref_path())
    }
}

/// Sibling `<name>.lock` file used to stage a replacement
pub(crate) fn lock_path(path: &Path) -> PathBuf {
    let mut file_name = path.file_name().unwrap_or_default().to_os_string();
    file_name.push(".lock");
    path.with_file_name(file_name)
}
