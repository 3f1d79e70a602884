//! Split point search
//!
//! The split point of two branches is found with a first-hit breadth-first
//! search:
//!
//! 1. Collect the ancestor set of the current tip
//! 2. Walk breadth-first from the other tip, visiting parents in order
//! 3. The first visited commit that is in the ancestor set is the split point
//!
//! This is not a lowest-common-ancestor search. In criss-cross histories
//! with several best common ancestors, the one returned depends on the BFS
//! order from the other tip.

use crate::artifacts::log::ancestry::Ancestry;
use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};

/// How two branch tips relate through their split point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeBase {
    /// The other tip is already part of the current history
    AlreadyMerged,
    /// The current tip is an ancestor of the other tip
    FastForward,
    /// The histories diverged at this commit
    SplitPoint(ObjectId),
}

pub struct SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    ancestry: Ancestry<CommitLoaderFn>,
}

impl<CommitLoaderFn> SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self {
            ancestry: Ancestry::new(commit_loader),
        }
    }

    pub fn find_split_point(
        &self,
        current_tip: &ObjectId,
        other_tip: &ObjectId,
    ) -> anyhow::Result<ObjectId> {
        let current_ancestors = self.ancestry.ancestor_set(current_tip)?;
        debug_merge_log!(
            "split point: {} ancestors of {}",
            current_ancestors.len(),
            current_tip.to_short_oid()
        );

        let mut visited = HashSet::from([other_tip.clone()]);
        let mut queue = VecDeque::from([other_tip.clone()]);

        while let Some(commit_id) = queue.pop_front() {
            debug_merge_log!("split point: visiting {}", commit_id.to_short_oid());

            if current_ancestors.contains(&commit_id) {
                debug_merge_log!("split point: found {}", commit_id.to_short_oid());
                return Ok(commit_id);
            }

            for parent in self.ancestry.load(&commit_id)?.parents {
                if visited.insert(parent.clone()) {
                    queue.push_back(parent);
                }
            }
        }

        anyhow::bail!(
            "commits {} and {} share no history",
            current_tip.to_short_oid(),
            other_tip.to_short_oid()
        )
    }

    pub fn merge_base(
        &self,
        current_tip: &ObjectId,
        other_tip: &ObjectId,
    ) -> anyhow::Result<MergeBase> {
        let split_point = self.find_split_point(current_tip, other_tip)?;

        if &split_point == other_tip {
            Ok(MergeBase::AlreadyMerged)
        } else if &split_point == current_tip {
            Ok(MergeBase::FastForward)
        } else {
            Ok(MergeBase::SplitPoint(split_point))
        }
    }
}
