use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::DvcError;

impl Repository {
    /// Create a branch pointing at the current HEAD commit
    pub fn branch(&self, branch_name: &str) -> crate::Result<()> {
        let branch_name = BranchName::try_parse(branch_name)?;

        if self.refs().branch_exists(&branch_name) {
            return Err(DvcError::BranchExists(branch_name.to_string()));
        }

        let head = self.refs().read_head()?.ok_or(DvcError::NoCommits)?;
        self.refs().create_branch(&branch_name, &head)?;

        log::info!("created branch {} at {}", branch_name, head.to_short_oid());

        Ok(())
    }

    /// Branch HEAD is attached to, `None` when detached
    pub fn current_branch(&self) -> crate::Result<Option<BranchName>> {
        Ok(self.refs().current_branch()?)
    }

    /// Every branch with at least one commit, sorted by name
    pub fn list_branches(&self) -> crate::Result<Vec<BranchName>> {
        Ok(self.refs().list_branches()?)
    }
}
