use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::merge::common_ancestor::is_ancestor;
use crate::artifacts::merge::resolve::MergeResolution;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::DvcError;

impl Repository {
    /// Merge a branch into the current HEAD
    ///
    /// Returns the new merge commit, or the unchanged HEAD when the target has
    /// nothing HEAD does not already contain. On conflict nothing is written.
    pub fn merge(&self, target: &str, message: Option<&str>) -> crate::Result<ObjectId> {
        let target_branch = BranchName::try_parse(target)
            .map_err(|_| DvcError::BranchNotFound(target.to_string()))?;
        let target_oid = self
            .refs()
            .read_branch(&target_branch)?
            .ok_or_else(|| DvcError::BranchNotFound(target.to_string()))?;

        if !self.index()?.is_empty() {
            return Err(DvcError::UncommittedChanges);
        }

        let head_oid = self.refs().read_head()?.ok_or(DvcError::NoCommits)?;
        // covers merging HEAD into itself
        if is_ancestor(&target_oid, &head_oid, |oid| self.parents_of(oid))? {
            log::info!("already up to date");
            return Ok(head_oid);
        }

        let base_oid = self.lowest_common_ancestor(&head_oid, &target_oid)?;

        log::debug!(
            "merging {} into {} with base {}",
            target_oid.to_short_oid(),
            head_oid.to_short_oid(),
            base_oid.to_short_oid()
        );

        let base_tree = self.database().load_commit_tree(&base_oid)?;
        let our_tree = self.database().load_commit_tree(&head_oid)?;
        let their_tree = self.database().load_commit_tree(&target_oid)?;

        let merged_tree = match MergeResolution::resolve(&base_tree, &our_tree, &their_tree) {
            MergeResolution::Clean(tree) => tree,
            MergeResolution::Conflicted(paths) => {
                log::info!("merge of {target_branch} stopped on {} conflict(s)", paths.len());
                return Err(DvcError::MergeConflict { paths });
            }
        };

        let message = match message {
            Some(message) => message.to_string(),
            None => self.default_merge_message(&target_branch)?,
        };

        let migration = self.plan_migration(&our_tree, &merged_tree)?;

        let tree_oid = self.database().store(&merged_tree)?;
        let commit_oid = self.write_commit(vec![head_oid, target_oid], tree_oid, &message)?;

        self.workspace()
            .apply_migration(&migration, self.database())?;

        Ok(commit_oid)
    }

    fn default_merge_message(&self, target_branch: &BranchName) -> crate::Result<String> {
        let current = match self.refs().current_branch()? {
            Some(branch_name) => branch_name.to_string(),
            None => "HEAD".to_string(),
        };

        Ok(format!("Merge branch '{target_branch}' into '{current}'"))
    }
}
