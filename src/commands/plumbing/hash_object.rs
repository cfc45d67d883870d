use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use std::path::Path;

impl Repository {
    /// Blob id of a file's content, stored in the database when `write` is set
    pub fn hash_object(&self, file_path: impl AsRef<Path>, write: bool) -> crate::Result<ObjectId> {
        let file_path = file_path.as_ref();
        let data = std::fs::read(file_path)
            .with_context(|| format!("unable to read {}", file_path.display()))?;

        let blob = Blob::new(Bytes::from(data));
        if !write {
            return Ok(blob.object_id()?);
        }

        Ok(self.database().store(&blob)?)
    }
}
