//! Object database
//!
//! Content-addressed storage for blobs, trees and commits. Objects are
//! zlib-compressed and sharded under `objects/<xx>/<38 hex chars>`. A write goes to
//! a temporary file in the shard directory and is renamed into place, so readers
//! never observe a half-written object; writing an object that already exists is a
//! no-op.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::DvcError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store raw content as a blob and return its id
    pub fn put(&self, content: impl Into<Bytes>) -> anyhow::Result<ObjectId> {
        self.store(&Blob::new(content.into()))
    }

    /// Raw content of the blob with the given id
    pub fn get(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        match self.parse_object(object_id)? {
            ObjectBox::Blob(blob) => Ok(blob.into_content()),
            other => anyhow::bail!("object {} is a {}, not a blob", object_id, other.object_type()),
        }
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        if object_path.exists() {
            log::debug!("{} {} already stored", object.object_type(), object_id);
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .with_context(|| format!("invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).with_context(|| {
            format!("unable to create object directory {}", object_dir.display())
        })?;

        self.write_object(&object_path, object.serialize()?)?;
        log::debug!("stored {} {}", object.object_type(), object_id);

        Ok(object_id)
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(object_reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(
                object_reader,
            )?))),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tree>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Tree => Ok(Some(Tree::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    /// Load a commit, failing with `InvalidCommitId` if the id names another type
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        self.parse_object_as_commit(object_id)?
            .ok_or_else(|| DvcError::InvalidCommitId(object_id.to_string()).into())
    }

    /// Tree snapshot recorded by a commit
    pub fn load_commit_tree(&self, commit_id: &ObjectId) -> anyhow::Result<Tree> {
        let commit = self.load_commit(commit_id)?;

        self.parse_object_as_tree(commit.tree_oid())?
            .with_context(|| format!("commit {} does not point at a tree", commit_id))
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, Cursor<Bytes>)> {
        let object_content = self.read_object(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let (object_type, size) = ObjectType::parse_header(&mut object_reader)?;
        let payload_len = object_reader.get_ref().len() - object_reader.position() as usize;
        if payload_len != size {
            anyhow::bail!(
                "object {} is corrupt: header says {} bytes, found {}",
                object_id,
                size,
                payload_len
            );
        }

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        if !object_path.is_file() {
            return Err(DvcError::ObjectNotFound(object_id.to_string()).into());
        }

        let object_content = std::fs::read(&object_path)
            .with_context(|| format!("unable to read object file {}", object_path.display()))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: &Path, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .with_context(|| format!("invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .with_context(|| {
                format!("unable to open object file {}", temp_object_path.display())
            })?;

        file.write_all(&object_content).with_context(|| {
            format!("unable to write object file {}", temp_object_path.display())
        })?;

        // the rename makes the object appear atomically
        std::fs::rename(&temp_object_path, object_path)
            .with_context(|| format!("unable to rename object file to {}", object_path.display()))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("unable to compress object content")?;

        encoder
            .finish()
            .map(Bytes::from)
            .context("unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    pub fn object_file(&self, object_id: &ObjectId) -> PathBuf {
        self.path.join(object_id.to_path())
    }
}
