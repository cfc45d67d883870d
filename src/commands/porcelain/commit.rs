use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::DvcError;

impl Repository {
    /// Record the staged changes on top of HEAD and advance the current branch
    ///
    /// The new tree is the HEAD tree with staged removals dropped and staged entries
    /// overlaid. The staging area is cleared only once the branch has moved.
    pub fn commit(&self, message: &str) -> crate::Result<ObjectId> {
        let mut index = self.index()?;
        if index.is_empty() {
            return Err(DvcError::NothingStaged);
        }

        let parent = self.refs().read_head()?;

        let mut entries = self.head_tree()?.into_entries();
        for path in index.removals() {
            entries.remove(path);
        }
        for (path, oid) in index.entries() {
            entries.insert(path.clone(), oid.clone());
        }
        let tree_oid = self.database().store(&Tree::new(entries))?;

        let commit_oid = self.write_commit(parent.into_iter().collect(), tree_oid, message)?;

        index.clear();
        index.write_updates()?;

        Ok(commit_oid)
    }

    /// Store a commit authored now and move HEAD (or its branch) to it
    pub(crate) fn write_commit(
        &self,
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        message: &str,
    ) -> anyhow::Result<ObjectId> {
        let author = Author::from_config(self.config());
        let commit = Commit::new(parents, tree_oid, author, message.trim().to_string());

        let commit_oid = self.database().store(&commit)?;
        self.refs().update_head(&commit_oid)?;

        log::info!(
            "[{}{}] {}",
            if commit.parents().is_empty() { "(root-commit) " } else { "" },
            commit_oid.to_short_oid(),
            commit.short_message()
        );

        Ok(commit_oid)
    }
}
