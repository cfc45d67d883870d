use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::diff::tree_diff::{DiffEntry, TreeDiff};
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Paths added, removed or modified going from commit `a` to commit `b`
    ///
    /// Either side may be a branch name or a full commit id.
    pub fn diff(&self, a: &str, b: &str) -> crate::Result<Vec<DiffEntry>> {
        let a = self.resolve_commit(a)?;
        let b = self.resolve_commit(b)?;

        let old_tree = self.database().load_commit_tree(&a)?;
        let new_tree = self.database().load_commit_tree(&b)?;

        Ok(TreeDiff::between(&old_tree, &new_tree).into_entries())
    }

    /// Branch tip, or a full commit id that names a stored commit
    pub fn resolve_commit(&self, revision: &str) -> crate::Result<ObjectId> {
        if let Ok(branch_name) = BranchName::try_parse(revision)
            && let Some(oid) = self.refs().read_branch(&branch_name)?
        {
            return Ok(oid);
        }

        let oid = ObjectId::try_parse(revision)?;
        self.database().load_commit(&oid)?;

        Ok(oid)
    }
}
