//! Tree object
//!
//! A tree is a flat snapshot mapping every tracked file path (relative to the
//! repository root, `/`-separated) to the id of the blob holding its content.
//! Entries are kept in a `BTreeMap`, so the serialized form and hence the tree id
//! do not depend on the order in which paths were staged.
//!
//! On disk: `tree <size>\0<entries>` where each entry is `<path>\0<20-byte id>`.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

pub type TreeEntryMap = BTreeMap<String, ObjectId>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: TreeEntryMap,
}

impl Tree {
    pub fn new(entries: TreeEntryMap) -> Self {
        Tree { entries }
    }

    pub fn get(&self, path: &str) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &TreeEntryMap {
        &self.entries
    }

    pub fn into_entries(self) -> TreeEntryMap {
        self.entries
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut payload = Vec::new();

        for (path, oid) in &self.entries {
            payload.write_all(path.as_bytes())?;
            payload.push(0);
            oid.write_raw_to(&mut payload)?;
        }

        frame(self.object_type(), &payload)
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut path_bytes = Vec::new();

        loop {
            path_bytes.clear();
            let n = reader.read_until(b'\0', &mut path_bytes)?;
            if n == 0 {
                break;
            }
            if path_bytes.pop() != Some(b'\0') {
                anyhow::bail!("unexpected EOF in tree entry path");
            }

            let path = String::from_utf8(path_bytes.clone())?;
            let oid = ObjectId::read_raw_from(&mut reader)
                .with_context(|| format!("unexpected EOF in object id of {path}"))?;

            entries.insert(path, oid);
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|(path, oid)| format!("{} {}\t{}", ObjectType::Blob, oid, path))
            .collect::<Vec<String>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn blob_id(content: &'static str) -> ObjectId {
        Blob::new(Bytes::from_static(content.as_bytes()))
            .object_id()
            .unwrap()
    }

    #[test]
    fn parses_what_it_serializes() {
        let tree = Tree::new(TreeEntryMap::from([
            ("a.txt".to_string(), blob_id("one")),
            ("dir/b.txt".to_string(), blob_id("two")),
        ]));

        let mut reader = Cursor::new(tree.serialize().unwrap());
        let (object_type, _) = ObjectType::parse_header(&mut reader).unwrap();

        assert_eq!(object_type, ObjectType::Tree);
        assert_eq!(Tree::deserialize(reader).unwrap(), tree);
    }

    #[test]
    fn id_is_independent_of_insertion_order() {
        let mut forward = TreeEntryMap::new();
        forward.insert("a".to_string(), blob_id("1"));
        forward.insert("b".to_string(), blob_id("2"));

        let mut backward = TreeEntryMap::new();
        backward.insert("b".to_string(), blob_id("2"));
        backward.insert("a".to_string(), blob_id("1"));

        assert_eq!(
            Tree::new(forward).object_id().unwrap(),
            Tree::new(backward).object_id().unwrap()
        );
    }

    #[test]
    fn truncated_entries_fail_to_parse() {
        let reader = Cursor::new(b"a.txt\0\x01\x02".to_vec());
        assert!(Tree::deserialize(reader).is_err());
    }
}
