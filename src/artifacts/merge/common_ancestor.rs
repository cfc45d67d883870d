//! Ancestor traversal over the commit graph
//!
//! Both walks are generic over a parent loader (`Fn(&ObjectId) -> Result<Vec<ObjectId>>`)
//! so they run unchanged against the object database or an in-memory graph.
//!
//! ## Lowest common ancestor
//!
//! Breadth-first searches are started from both commits and advanced one level at
//! a time, always expanding the shallower side. Every commit reached by both
//! searches is a candidate scored by the sum of its two distances. The search stops
//! once no undiscovered commit could score lower than the best candidate:
//! a commit not yet reached from one side is at least one level beyond that side's
//! current depth.
//!
//! Among candidates with the same score the smallest id wins, so the result never
//! depends on parent order or on which commit was passed first.

use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{HashMap, HashSet, VecDeque};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const VISITED_FROM_SOURCE = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
    }
}

#[derive(Debug, Default)]
struct Visit {
    state: VisitState,
    source_distance: usize,
    target_distance: usize,
}

impl Default for VisitState {
    fn default() -> Self {
        VisitState::empty()
    }
}

/// One side of the bidirectional search
#[derive(Debug)]
struct Frontier {
    flag: VisitState,
    commits: Vec<ObjectId>,
    depth: usize,
}

impl Frontier {
    fn new(flag: VisitState, start: ObjectId) -> Self {
        Frontier {
            flag,
            commits: vec![start],
            depth: 0,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.commits.is_empty()
    }
}

pub struct CommonAncestorFinder<ParentLoaderFn>
where
    ParentLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    parents_of: ParentLoaderFn,
}

impl<ParentLoaderFn> CommonAncestorFinder<ParentLoaderFn>
where
    ParentLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    pub fn new(parents_of: ParentLoaderFn) -> Self {
        Self { parents_of }
    }

    /// Lowest common ancestor, `None` for disjoint histories
    pub fn find(&self, source: &ObjectId, target: &ObjectId) -> anyhow::Result<Option<ObjectId>> {
        let mut visits: HashMap<ObjectId, Visit> = HashMap::new();
        let mut best: Option<(usize, ObjectId)> = None;

        visits.entry(source.clone()).or_default().state |= VisitState::VISITED_FROM_SOURCE;
        visits.entry(target.clone()).or_default().state |= VisitState::VISITED_FROM_TARGET;
        if source == target {
            return Ok(Some(source.clone()));
        }

        let mut source_side = Frontier::new(VisitState::VISITED_FROM_SOURCE, source.clone());
        let mut target_side = Frontier::new(VisitState::VISITED_FROM_TARGET, target.clone());

        loop {
            // lowest score a commit discovered from here on could have
            let bound = match (source_side.is_exhausted(), target_side.is_exhausted()) {
                (true, true) => break,
                (false, true) => source_side.depth + 1,
                (true, false) => target_side.depth + 1,
                (false, false) => source_side.depth.min(target_side.depth) + 1,
            };
            if let Some((score, _)) = &best
                && *score < bound
            {
                break;
            }

            let side = if target_side.is_exhausted()
                || (!source_side.is_exhausted() && source_side.depth <= target_side.depth)
            {
                &mut source_side
            } else {
                &mut target_side
            };

            for (score, oid) in self.expand(side, &mut visits)? {
                if best.as_ref().is_none_or(|current| (score, &oid) < (current.0, &current.1)) {
                    best = Some((score, oid));
                }
            }
        }

        log::trace!(
            "lowest common ancestor of {} and {}: {:?}",
            source.to_short_oid(),
            target.to_short_oid(),
            best.as_ref().map(|(score, oid)| (score, oid.to_short_oid()))
        );

        Ok(best.map(|(_, oid)| oid))
    }

    /// Advance one side by a level, returning commits that became common
    fn expand(
        &self,
        side: &mut Frontier,
        visits: &mut HashMap<ObjectId, Visit>,
    ) -> anyhow::Result<Vec<(usize, ObjectId)>> {
        let depth = side.depth + 1;
        let mut next_level = Vec::new();
        let mut found = Vec::new();

        for commit in std::mem::take(&mut side.commits) {
            for parent in (self.parents_of)(&commit)? {
                let visit = visits.entry(parent.clone()).or_default();
                if visit.state.contains(side.flag) {
                    continue;
                }

                visit.state |= side.flag;
                if side.flag == VisitState::VISITED_FROM_SOURCE {
                    visit.source_distance = depth;
                } else {
                    visit.target_distance = depth;
                }

                if visit.state == VisitState::VISITED_FROM_BOTH {
                    found.push((visit.source_distance + visit.target_distance, parent.clone()));
                }
                next_level.push(parent);
            }
        }

        side.commits = next_level;
        side.depth = depth;

        Ok(found)
    }
}

/// Breadth-first walk over every commit reachable from a start commit
///
/// Each commit is yielded once, the start commit first, then its parents in
/// recorded order, then theirs. Commits are loaded lazily as the walk advances.
pub struct Ancestors<ParentLoaderFn>
where
    ParentLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    parents_of: ParentLoaderFn,
    queue: VecDeque<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl<ParentLoaderFn> Ancestors<ParentLoaderFn>
where
    ParentLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    pub fn new(start: ObjectId, parents_of: ParentLoaderFn) -> Self {
        Ancestors {
            parents_of,
            seen: HashSet::from([start.clone()]),
            queue: VecDeque::from([start]),
        }
    }
}

impl<ParentLoaderFn> Iterator for Ancestors<ParentLoaderFn>
where
    ParentLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    type Item = anyhow::Result<ObjectId>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit = self.queue.pop_front()?;

        match (self.parents_of)(&commit) {
            Ok(parents) => {
                for parent in parents {
                    if self.seen.insert(parent.clone()) {
                        self.queue.push_back(parent);
                    }
                }
                Some(Ok(commit))
            }
            Err(error) => {
                self.queue.clear();
                Some(Err(error))
            }
        }
    }
}

/// Whether `ancestor` is reachable from `descendant` (a commit is its own ancestor)
pub fn is_ancestor<ParentLoaderFn>(
    ancestor: &ObjectId,
    descendant: &ObjectId,
    parents_of: ParentLoaderFn,
) -> anyhow::Result<bool>
where
    ParentLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    for commit in Ancestors::new(descendant.clone(), parents_of) {
        if &commit? == ancestor {
            return Ok(true);
        }
    }

    Ok(false)
}
