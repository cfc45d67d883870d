//! Error kinds surfaced by repository operations
//!
//! Lower layers (object database, refs, index, workspace) work with `anyhow::Result`
//! and attach context to I/O failures. When they detect one of the well-known
//! conditions below they raise it as a `DvcError`, which survives the trip through
//! `anyhow` and comes back out intact at the public API boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DvcError {
    #[error("not a dvc repository (or any of the parent directories): {0}")]
    NotInitialized(String),

    #[error("object {0} not found")]
    ObjectNotFound(String),

    #[error("pathspec '{0}' did not match any files")]
    FileNotFound(String),

    #[error("nothing to commit, staging area is empty")]
    NothingStaged,

    #[error("a branch named '{0}' already exists")]
    BranchExists(String),

    #[error("branch '{0}' not found")]
    BranchNotFound(String),

    #[error("your staging area contains uncommitted changes")]
    UncommittedChanges,

    #[error("automatic merge failed, conflicts in: {}", .paths.join(", "))]
    MergeConflict { paths: Vec<String> },

    #[error("'{0}' is not a valid commit id")]
    InvalidCommitId(String),

    #[error("no common ancestor between {0} and {1}")]
    NoCommonAncestor(String, String),

    #[error("no commits yet on the current branch")]
    NoCommits,

    #[error("'{0}' is not a valid branch name")]
    InvalidBranchName(String),

    #[error("'{0}' is outside repository")]
    OutsideRepository(String),

    #[error("destination path '{0}' already exists")]
    DestinationExists(String),

    #[error("untracked working tree files would be overwritten: {}", .paths.join(", "))]
    UntrackedOverwritten { paths: Vec<String> },

    #[error("path {0:?} contains a line break and cannot be tracked")]
    UnsupportedPath(String),

    #[error(transparent)]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for DvcError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<DvcError>() {
            Ok(dvc_error) => dvc_error,
            Err(error) => DvcError::Internal(error),
        }
    }
}

impl From<std::io::Error> for DvcError {
    fn from(error: std::io::Error) -> Self {
        DvcError::Internal(error.into())
    }
}

/// A specialized `Result` type for repository operations.
pub type Result<T> = std::result::Result<T, DvcError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn typed_errors_survive_anyhow_context() {
        let error: anyhow::Error = DvcError::BranchNotFound("feature".to_string()).into();
        let error = Err::<(), _>(error)
            .context("while checking out")
            .unwrap_err();

        let error = DvcError::from(error);
        assert!(matches!(error, DvcError::BranchNotFound(name) if name == "feature"));
    }

    #[test]
    fn foreign_errors_become_internal() {
        let error = DvcError::from(anyhow::anyhow!("disk on fire"));
        assert!(matches!(error, DvcError::Internal(_)));
        assert_eq!(error.to_string(), "disk on fire");
    }

    #[test]
    fn merge_conflict_lists_paths() {
        let error = DvcError::MergeConflict {
            paths: vec!["a.txt".to_string(), "b/c.txt".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "automatic merge failed, conflicts in: a.txt, b/c.txt"
        );
    }
}
