//! Three-way tree merge
//!
//! Each side is compared against the common ancestor's tree. A path changed on
//! only one side takes that side's version; a path changed identically on both
//! sides takes the shared version. A path changed differently on both sides,
//! including a modification on one side against a removal on the other, is a
//! conflict. Paths changed on neither side keep the ancestor's blob.

use crate::artifacts::diff::tree_diff::TreeDiff;
use crate::artifacts::objects::tree::Tree;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeResolution {
    Clean(Tree),
    /// Conflicting paths, sorted
    Conflicted(Vec<String>),
}

impl MergeResolution {
    pub fn resolve(base: &Tree, ours: &Tree, theirs: &Tree) -> Self {
        let our_changes = TreeDiff::between(base, ours);
        let their_changes = TreeDiff::between(base, theirs);

        let changed_paths = our_changes
            .changes()
            .keys()
            .chain(their_changes.changes().keys())
            .collect::<BTreeSet<_>>();

        let mut merged = base.entries().clone();
        let mut conflicts = Vec::new();

        for path in changed_paths {
            let resolved = match (our_changes.change_for(path), their_changes.change_for(path)) {
                (Some(ours), None) => ours.new_oid(),
                (None, Some(theirs)) => theirs.new_oid(),
                (Some(ours), Some(theirs)) if ours.new_oid() == theirs.new_oid() => ours.new_oid(),
                (Some(_), Some(_)) => {
                    conflicts.push(path.clone());
                    continue;
                }
                (None, None) => continue,
            };

            match resolved {
                Some(oid) => merged.insert(path.clone(), oid.clone()),
                None => merged.remove(path),
            };
        }

        if conflicts.is_empty() {
            MergeResolution::Clean(Tree::new(merged))
        } else {
            MergeResolution::Conflicted(conflicts)
        }
    }
}
