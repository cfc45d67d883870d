use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::log::rev_list::{LogEntry, RevList};
use crate::errors::DvcError;

impl Repository {
    /// History of a branch, newest first; empty for the unborn current branch
    pub fn log(&self, branch_name: &str) -> crate::Result<Vec<LogEntry>> {
        let branch = BranchName::try_parse(branch_name)
            .map_err(|_| DvcError::BranchNotFound(branch_name.to_string()))?;

        let start = self.refs().read_branch(&branch)?;
        if start.is_none() && self.refs().current_branch()?.as_ref() != Some(&branch) {
            return Err(DvcError::BranchNotFound(branch_name.to_string()));
        }

        Ok(RevList::new(self, start)
            .walk()
            .collect::<anyhow::Result<Vec<_>>>()?)
    }

    /// History of whatever HEAD points at, including a detached commit
    pub fn log_head(&self) -> crate::Result<Vec<LogEntry>> {
        let start = self.refs().read_head()?;

        Ok(RevList::new(self, start)
            .walk()
            .collect::<anyhow::Result<Vec<_>>>()?)
    }
}
