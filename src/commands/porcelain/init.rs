use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::config::RepositoryConfig;
use anyhow::Context;
use std::fs;
use std::path::Path;

impl Repository {
    /// Create the `.dvc` layout under `path`, HEAD on the unborn default branch
    ///
    /// Running it again on an existing repository keeps its state.
    pub fn init(path: impl AsRef<Path>, config: RepositoryConfig) -> crate::Result<Self> {
        let path = path.as_ref();
        fs::create_dir_all(path)
            .with_context(|| format!("unable to create directory {}", path.display()))?;

        let repository = Repository::at(path, config)?;

        fs::create_dir_all(repository.database().objects_path())
            .context("unable to create .dvc/objects directory")?;
        fs::create_dir_all(repository.refs().heads_path())
            .context("unable to create .dvc/refs/heads directory")?;

        if !repository.refs().head_path().exists() {
            let default_branch = BranchName::try_parse(repository.config().default_branch.as_str())?;
            repository
                .refs()
                .set_head(&Head::Branch(default_branch))
                .context("unable to create initial HEAD reference")?;
        }

        let index_path = repository.metadata_path().join("index");
        if !index_path.exists() {
            fs::write(&index_path, b"").context("unable to create .dvc/index file")?;
        }

        log::info!("initialized repository in {}", repository.path().display());

        Ok(repository)
    }
}
