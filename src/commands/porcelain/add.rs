use crate::areas::repository::Repository;
use crate::areas::workspace::METADATA_DIR;
use crate::errors::DvcError;
use std::path::Path;

impl Repository {
    /// Stage a file, or every file below a directory
    ///
    /// `path` is absolute or relative to the current directory.
    pub fn add(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        self.add_all(&[path])
    }

    /// Stage several paths in one index update
    ///
    /// Either every path is staged or, on error, the index is left untouched.
    pub fn add_all(&self, paths: &[impl AsRef<Path>]) -> crate::Result<()> {
        let cwd = std::env::current_dir()?;
        let ignore_filter = self.ignore_filter()?;
        let head_tree = self.head_tree()?;
        let mut index = self.index()?;

        for path in paths {
            let user_path = path.as_ref();
            let absolute_path = self.workspace().resolve_user_path(&cwd, user_path);
            let relative_path = self.workspace().relative_path(&absolute_path)?;

            if !absolute_path.exists() {
                // a tracked file or directory deleted from the working directory
                let removed = head_tree
                    .entries()
                    .keys()
                    .filter(|tracked| is_within(tracked, &relative_path))
                    .cloned()
                    .collect::<Vec<_>>();
                if removed.is_empty() {
                    return Err(DvcError::FileNotFound(user_path.display().to_string()));
                }

                for tracked in removed {
                    log::debug!("staging removal of {tracked}");
                    index.stage_removal(tracked);
                }
                continue;
            }

            let files = self.workspace().list_files(&absolute_path)?;
            for file in &files {
                if is_within(file, METADATA_DIR) {
                    continue;
                }
                if ignore_filter.is_ignored(file) {
                    log::warn!("skipping ignored path {file}");
                    continue;
                }

                let data = self.workspace().read_file(file)?;
                let blob_id = self.database().put(data)?;
                index.stage(file.as_str(), blob_id);
            }

            // tracked files that disappeared from a directory being added
            for tracked in head_tree.entries().keys() {
                if is_within(tracked, &relative_path) && files.binary_search(tracked).is_err() {
                    log::debug!("staging removal of {tracked}");
                    index.stage_removal(tracked.as_str());
                }
            }
        }

        if index.is_changed() {
            index.write_updates()?;
        }

        Ok(())
    }
}

/// Whether `path` is `prefix` itself or lies below it; the empty prefix is the root
fn is_within(path: &str, prefix: &str) -> bool {
    prefix.is_empty()
        || path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
