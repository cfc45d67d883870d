use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEntryMap};
use bitflags::bitflags;
use std::collections::BTreeMap;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct DiffFilter: u32 {
        const ADDED = 0b0001;
        const REMOVED = 0b0010;
        const MODIFIED = 0b0100;
    }
}

impl DiffFilter {
    /// Parse `--diff-filter` letters, e.g. `AM`
    pub fn try_parse(s: &str) -> Option<Self> {
        let mut filter = Self::empty();

        for c in s.chars() {
            match c {
                'A' => filter |= Self::ADDED,
                'D' => filter |= Self::REMOVED,
                'M' => filter |= Self::MODIFIED,
                _ => return None,
            }
        }

        Some(filter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeChangeType {
    Added(ObjectId),
    Removed(ObjectId),
    Modified { old: ObjectId, new: ObjectId },
}

impl TreeChangeType {
    pub fn from_entries(old: Option<&ObjectId>, new: Option<&ObjectId>) -> Option<Self> {
        match (old, new) {
            (None, Some(new)) => Some(TreeChangeType::Added(new.clone())),
            (Some(old), None) => Some(TreeChangeType::Removed(old.clone())),
            (Some(old), Some(new)) if old != new => Some(TreeChangeType::Modified {
                old: old.clone(),
                new: new.clone(),
            }),
            _ => None,
        }
    }

    pub fn matches_filter(&self, filter: DiffFilter) -> bool {
        match self {
            TreeChangeType::Added(_) => filter.contains(DiffFilter::ADDED),
            TreeChangeType::Removed(_) => filter.contains(DiffFilter::REMOVED),
            TreeChangeType::Modified { .. } => filter.contains(DiffFilter::MODIFIED),
        }
    }

    /// Blob the path holds after the change, `None` when removed
    pub fn new_oid(&self) -> Option<&ObjectId> {
        match self {
            TreeChangeType::Added(oid) => Some(oid),
            TreeChangeType::Modified { new, .. } => Some(new),
            TreeChangeType::Removed(_) => None,
        }
    }

    pub fn status_char(&self) -> char {
        match self {
            TreeChangeType::Added(_) => 'A',
            TreeChangeType::Removed(_) => 'D',
            TreeChangeType::Modified { .. } => 'M',
        }
    }
}

/// One changed path between two snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub path: String,
    pub change: TreeChangeType,
}

impl DiffEntry {
    /// `<status>\t<path>`, the name-status line
    pub fn display(&self) -> String {
        format!("{}\t{}", self.change.status_char(), self.path)
    }
}

pub type ChangeSet = BTreeMap<String, TreeChangeType>;

/// Path-level comparison of two flat trees
///
/// Unchanged paths are omitted. Iteration is in path order, so the output for
/// a given pair of trees never varies.
#[derive(Debug, Clone, Default)]
pub struct TreeDiff {
    change_set: ChangeSet,
}

impl TreeDiff {
    pub fn between(old: &Tree, new: &Tree) -> Self {
        Self::between_entries(old.entries(), new.entries())
    }

    pub fn between_entries(old: &TreeEntryMap, new: &TreeEntryMap) -> Self {
        let mut change_set = ChangeSet::new();

        for (path, old_oid) in old {
            if let Some(change) = TreeChangeType::from_entries(Some(old_oid), new.get(path)) {
                change_set.insert(path.clone(), change);
            }
        }
        for (path, new_oid) in new {
            if !old.contains_key(path) {
                change_set.insert(path.clone(), TreeChangeType::Added(new_oid.clone()));
            }
        }

        TreeDiff { change_set }
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.change_set
    }

    pub fn change_for(&self, path: &str) -> Option<&TreeChangeType> {
        self.change_set.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.change_set.is_empty()
    }

    pub fn into_entries(self) -> Vec<DiffEntry> {
        self.change_set
            .into_iter()
            .map(|(path, change)| DiffEntry { path, change })
            .collect()
    }
}
