//! Working directory migration between two snapshots
//!
//! A migration is planned from the tree currently checked out and the tree to
//! materialize. Paths tracked before but absent from the target are deleted;
//! every target path is written unless the file already holds that content.
//! Untracked files are left alone.

use crate::artifacts::diff::tree_diff::{TreeChangeType, TreeDiff};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Migration {
    deletions: Vec<String>,
    writes: BTreeMap<String, ObjectId>,
}

impl Migration {
    pub fn plan(current: &Tree, target: &Tree) -> Self {
        let deletions = TreeDiff::between(current, target)
            .changes()
            .iter()
            .filter(|(_, change)| matches!(change, TreeChangeType::Removed(_)))
            .map(|(path, _)| path.clone())
            .collect();

        Migration {
            deletions,
            writes: target.entries().clone(),
        }
    }

    pub fn deletions(&self) -> &[String] {
        &self.deletions
    }

    pub fn writes(&self) -> &BTreeMap<String, ObjectId> {
        &self.writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn deletes_only_paths_dropped_by_the_target() {
        let current = Tree::new(BTreeMap::from([
            ("gone.txt".to_string(), oid('1')),
            ("kept.txt".to_string(), oid('2')),
        ]));
        let target = Tree::new(BTreeMap::from([
            ("kept.txt".to_string(), oid('3')),
            ("new.txt".to_string(), oid('4')),
        ]));

        let migration = Migration::plan(&current, &target);

        assert_eq!(migration.deletions(), &["gone.txt".to_string()]);
        assert_eq!(migration.writes(), target.entries());
    }
}
