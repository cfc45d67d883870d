use crate::areas::repository::Repository;
use crate::areas::workspace::METADATA_DIR;
use crate::artifacts::objects::tree::Tree;
use crate::errors::DvcError;
use anyhow::Context;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

impl Repository {
    /// Copy the repository metadata to a new directory and check out its HEAD there
    ///
    /// Objects, refs, HEAD and the index are copied byte for byte.
    pub fn clone_to(&self, destination: impl AsRef<Path>) -> crate::Result<Repository> {
        let destination = destination.as_ref();
        if destination.exists() {
            return Err(DvcError::DestinationExists(destination.display().to_string()));
        }

        let source_metadata = self.metadata_path();
        let destination_metadata = destination.join(METADATA_DIR);

        for entry in WalkDir::new(&source_metadata) {
            let entry = entry.context("unable to walk repository metadata")?;
            let relative_path = entry
                .path()
                .strip_prefix(&source_metadata)
                .context("metadata entry outside repository")?;
            let target_path = destination_metadata.join(relative_path);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target_path)
                    .with_context(|| format!("unable to create {}", target_path.display()))?;
            } else if entry.file_type().is_file() {
                fs::copy(entry.path(), &target_path)
                    .with_context(|| format!("unable to copy {}", entry.path().display()))?;
            }
        }

        let cloned = Repository::open(destination, self.config().clone())?;
        let head_tree = cloned.head_tree()?;
        cloned.materialize(&Tree::default(), &head_tree)?;

        log::info!(
            "cloned {} into {}",
            self.path().display(),
            cloned.path().display()
        );

        Ok(cloned)
    }
}
