//! Working directory access
//!
//! Paths handed to the rest of the crate are repository-relative and
//! `/`-separated regardless of platform, matching how they are recorded in trees
//! and the index. The metadata directory is never listed.

use crate::areas::database::Database;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::tree::Tree;
use crate::errors::DvcError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

pub const METADATA_DIR: &str = ".dvc";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Repository-relative form of an absolute path inside the workspace
    pub fn relative_path(&self, absolute_path: &Path) -> anyhow::Result<String> {
        let relative = absolute_path
            .strip_prefix(&self.path)
            .map_err(|_| DvcError::OutsideRepository(absolute_path.display().to_string()))?;

        let components = relative
            .components()
            .map(|component| match component {
                Component::Normal(name) => Ok(name.to_string_lossy().to_string()),
                _ => Err(DvcError::OutsideRepository(absolute_path.display().to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let relative_path = components.join("/");

        // index entries are line-delimited
        if relative_path.contains(['\n', '\r']) {
            return Err(DvcError::UnsupportedPath(relative_path).into());
        }

        Ok(relative_path)
    }

    /// Absolute location of a repository-relative path
    pub fn absolute_path(&self, relative_path: &str) -> PathBuf {
        relative_path
            .split('/')
            .fold(self.path.to_path_buf(), |path, component| path.join(component))
    }

    /// Resolve user input (absolute, or relative to `cwd`) without requiring it to exist
    pub fn resolve_user_path(&self, cwd: &Path, user_path: &Path) -> PathBuf {
        let joined = if user_path.is_absolute() {
            user_path.to_path_buf()
        } else {
            cwd.join(user_path)
        };

        let joined = normalize(&joined);

        // canonicalize the deepest existing ancestor so symlinked roots still match
        let mut existing = joined.as_path();
        let mut missing = Vec::new();
        while !existing.exists() {
            match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name.to_os_string());
                    existing = parent;
                }
                _ => break,
            }
        }

        match existing.canonicalize() {
            Ok(base) => missing
                .iter()
                .rev()
                .fold(base, |path, name| path.join(name)),
            Err(_) => joined,
        }
    }

    /// Every file under `root` (a file or directory), relative and sorted
    pub fn list_files(&self, root: &Path) -> anyhow::Result<Vec<String>> {
        if root.is_file() {
            return Ok(vec![self.relative_path(root)?]);
        }

        let metadata_dir = self.path.join(METADATA_DIR);
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.path() != metadata_dir);
        for entry in walker {
            let entry = entry.with_context(|| format!("unable to list {}", root.display()))?;
            if entry.file_type().is_file() {
                files.push(self.relative_path(entry.path())?);
            }
        }
        files.sort();

        Ok(files)
    }

    pub fn read_file(&self, relative_path: &str) -> anyhow::Result<Bytes> {
        let file_path = self.absolute_path(relative_path);

        std::fs::read(&file_path)
            .map(Bytes::from)
            .with_context(|| format!("unable to read {}", file_path.display()))
    }

    pub fn parse_blob(&self, relative_path: &str) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(relative_path)?))
    }

    pub fn write_file(&self, relative_path: &str, data: &[u8]) -> anyhow::Result<()> {
        let file_path = self.absolute_path(relative_path);

        if file_path.is_dir() {
            std::fs::remove_dir_all(&file_path).with_context(|| {
                format!("unable to remove directory in the way of {relative_path}")
            })?;
        }
        if let Some(parent) = file_path.parent() {
            self.make_directory(parent)?;
        }

        std::fs::write(&file_path, data)
            .with_context(|| format!("unable to write {}", file_path.display()))
    }

    /// Delete a file and any directories it leaves empty
    pub fn remove_file(&self, relative_path: &str) -> anyhow::Result<()> {
        let file_path = self.absolute_path(relative_path);

        if file_path.is_file() {
            std::fs::remove_file(&file_path)
                .with_context(|| format!("unable to remove {}", file_path.display()))?;
        }

        let mut parent = file_path.parent();
        while let Some(dir) = parent {
            if dir == self.path.as_ref() || !dir.is_dir() || dir.read_dir()?.next().is_some() {
                break;
            }
            std::fs::remove_dir(dir)
                .with_context(|| format!("unable to remove directory {}", dir.display()))?;
            parent = dir.parent();
        }

        Ok(())
    }

    /// Untracked files a migration would destroy, sorted
    ///
    /// `tracked` is the snapshot currently checked out. An untracked file is in the
    /// way when it sits inside a directory that must become a file, where one of a
    /// written path's parent directories must go, or at a written path with other
    /// content.
    pub fn untracked_obstructions(
        &self,
        migration: &Migration,
        tracked: &Tree,
    ) -> anyhow::Result<Vec<String>> {
        let mut obstructions = BTreeSet::new();

        for (path, oid) in migration.writes() {
            let file_path = self.absolute_path(path);

            if file_path.is_dir() {
                for file in self.list_files(&file_path)? {
                    if !tracked.contains(&file) {
                        obstructions.insert(file);
                    }
                }
            } else if file_path.is_file()
                && !tracked.contains(path)
                && &self.parse_blob(path)?.object_id()? != oid
            {
                obstructions.insert(path.clone());
            }

            let mut prefix = path.as_str();
            while let Some((parent, _)) = prefix.rsplit_once('/') {
                if self.absolute_path(parent).is_file() && !tracked.contains(parent) {
                    obstructions.insert(parent.to_string());
                }
                prefix = parent;
            }
        }

        Ok(obstructions.into_iter().collect())
    }

    /// Bring the working directory in line with a planned migration
    ///
    /// Deletions run first so that a file replaced by a directory (or the reverse)
    /// is out of the way before the new content is written. Files already holding
    /// the target content are left untouched.
    pub fn apply_migration(&self, migration: &Migration, database: &Database) -> anyhow::Result<()> {
        for path in migration.deletions() {
            self.remove_file(path)?;
        }

        for (path, oid) in migration.writes() {
            let file_path = self.absolute_path(path);
            if file_path.is_file() && &self.parse_blob(path)?.object_id()? == oid {
                continue;
            }

            let data = database.get(oid)?;
            self.write_file(path, &data)?;
        }

        Ok(())
    }

    /// Create a directory and its parents, replacing files standing in the way
    fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        if dir_path.is_dir() {
            return Ok(());
        }

        let mut ancestor = Some(dir_path);
        while let Some(path) = ancestor {
            if path == self.path.as_ref() {
                break;
            }
            if path.is_file() {
                std::fs::remove_file(path)
                    .with_context(|| format!("unable to remove file in the way of {}", dir_path.display()))?;
                break;
            }
            ancestor = path.parent();
        }

        std::fs::create_dir_all(dir_path)
            .with_context(|| format!("unable to create directory {}", dir_path.display()))
    }
}

/// Lexically resolve `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}
