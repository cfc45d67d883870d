use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{METADATA_DIR, Workspace};
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::ignore::IgnoreFilter;
use crate::artifacts::merge::common_ancestor::{Ancestors, CommonAncestorFinder};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::config::RepositoryConfig;
use crate::errors::DvcError;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Handle on one repository: the working directory plus its `.dvc` metadata
///
/// Nothing is cached between operations; refs, the index and objects are read from
/// disk whenever an operation needs them.
#[derive(Debug)]
pub struct Repository {
    path: Box<Path>,
    config: RepositoryConfig,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open the repository rooted at `path`
    pub fn open(path: impl AsRef<Path>, config: RepositoryConfig) -> crate::Result<Self> {
        let path = path.as_ref();
        if !path.join(METADATA_DIR).is_dir() {
            return Err(DvcError::NotInitialized(path.display().to_string()));
        }

        Ok(Self::at(path, config)?)
    }

    /// Open the repository containing `start`, searching parent directories
    pub fn discover(start: impl AsRef<Path>, config: RepositoryConfig) -> crate::Result<Self> {
        let start = start.as_ref();
        let start = start
            .canonicalize()
            .with_context(|| format!("unable to resolve {}", start.display()))?;

        match start
            .ancestors()
            .find(|candidate| candidate.join(METADATA_DIR).is_dir())
        {
            Some(root) => Self::open(root, config),
            None => Err(DvcError::NotInitialized(start.display().to_string())),
        }
    }

    /// Lay out the handles for `path` without checking that it is initialized
    pub(crate) fn at(path: &Path, config: RepositoryConfig) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("unable to resolve {}", path.display()))?;
        let metadata_path = path.join(METADATA_DIR);

        Ok(Repository {
            database: Database::new(metadata_path.join("objects").into_boxed_path()),
            refs: Refs::new(metadata_path.into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            path: path.into_boxed_path(),
            config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Staging area as currently persisted
    pub fn index(&self) -> anyhow::Result<Index> {
        let mut index = Index::new(self.metadata_path().join("index").into_boxed_path());
        index.rehydrate()?;

        Ok(index)
    }

    pub fn ignore_filter(&self) -> anyhow::Result<IgnoreFilter> {
        IgnoreFilter::load(&self.path)
    }

    /// Commit HEAD resolves to, `None` on an unborn branch
    pub fn current_head(&self) -> crate::Result<Option<ObjectId>> {
        Ok(self.refs.read_head()?)
    }

    /// Tree of the HEAD commit, empty on an unborn branch
    pub fn head_tree(&self) -> anyhow::Result<Tree> {
        match self.refs.read_head()? {
            Some(head) => self.database.load_commit_tree(&head),
            None => Ok(Tree::default()),
        }
    }

    /// Parent ids of a commit, as recorded in the object database
    pub fn parents_of(&self, commit_id: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        Ok(self.database.load_commit(commit_id)?.parents().to_vec())
    }

    /// Lazy breadth-first walk from `commit_id` (inclusive) to the root(s)
    pub fn ancestors(
        &self,
        commit_id: ObjectId,
    ) -> Ancestors<impl Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>> + '_> {
        Ancestors::new(commit_id, move |oid| self.parents_of(oid))
    }

    pub fn lowest_common_ancestor(&self, a: &ObjectId, b: &ObjectId) -> crate::Result<ObjectId> {
        CommonAncestorFinder::new(|oid| self.parents_of(oid))
            .find(a, b)?
            .ok_or_else(|| DvcError::NoCommonAncestor(a.to_string(), b.to_string()))
    }

    /// Rewrite the working directory from one snapshot to another
    pub(crate) fn materialize(&self, from: &Tree, to: &Tree) -> anyhow::Result<()> {
        let migration = self.plan_migration(from, to)?;
        self.workspace.apply_migration(&migration, &self.database)
    }

    /// Plan the move between snapshots, failing if it would clobber untracked files
    pub(crate) fn plan_migration(&self, from: &Tree, to: &Tree) -> anyhow::Result<Migration> {
        let migration = Migration::plan(from, to);

        let paths = self.workspace.untracked_obstructions(&migration, from)?;
        if !paths.is_empty() {
            return Err(DvcError::UntrackedOverwritten { paths }.into());
        }

        Ok(migration)
    }
}
