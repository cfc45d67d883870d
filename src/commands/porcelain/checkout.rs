use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::DvcError;

impl Repository {
    /// Switch to a branch, or detach HEAD at a full commit id
    ///
    /// Requires an empty staging area. The working directory is brought in line
    /// with the target snapshot before HEAD moves; untracked files in the way fail the
    /// checkout before anything is written.
    pub fn checkout(&self, target: &str) -> crate::Result<()> {
        let (head, target_oid) = self.resolve_checkout_target(target)?;

        if !self.index()?.is_empty() {
            return Err(DvcError::UncommittedChanges);
        }

        let current_tree = self.head_tree()?;
        let target_tree = match &target_oid {
            Some(oid) => self.database().load_commit_tree(oid)?,
            None => Tree::default(),
        };

        self.materialize(&current_tree, &target_tree)?;
        self.refs().set_head(&head)?;

        match &head {
            Head::Branch(branch_name) => log::info!("switched to branch '{branch_name}'"),
            Head::Detached(oid) => log::info!("HEAD is now at {}", oid.to_short_oid()),
        }

        Ok(())
    }

    fn resolve_checkout_target(&self, target: &str) -> crate::Result<(Head, Option<ObjectId>)> {
        if let Ok(branch_name) = BranchName::try_parse(target) {
            if let Some(oid) = self.refs().read_branch(&branch_name)? {
                return Ok((Head::Branch(branch_name), Some(oid)));
            }
            // the current branch before its first commit
            if self.refs().current_branch()?.as_ref() == Some(&branch_name) {
                return Ok((Head::Branch(branch_name), None));
            }
        }

        if ObjectId::is_well_formed(target) {
            let oid = ObjectId::try_parse(target)?;
            if self.database().contains(&oid) {
                self.database().load_commit(&oid)?;
                return Ok((Head::Detached(oid.clone()), Some(oid)));
            }
        }

        Err(DvcError::BranchNotFound(target.to_string()))
    }
}
