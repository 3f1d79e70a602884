//! Ancestor closure over the commit graph
//!
//! All traversals are breadth-first over parent edges, visiting the parents
//! of each commit in order and every commit at most once. The graph is read
//! through a commit loader, so the same code runs against the object database
//! or an in-memory graph.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};

pub struct Ancestry<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> Ancestry<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Load a commit's graph node
    pub fn load(&self, commit_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        (self.commit_loader)(commit_id)
    }

    /// Every commit reachable from `tip`, `tip` included, in BFS order
    pub fn walk(&self, tip: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        self.walk_until(tip, |_| false)
    }

    /// BFS from `tip` that does not expand past commits matching `stop`
    ///
    /// Matching commits are neither returned nor traversed.
    fn walk_until(
        &self,
        tip: &ObjectId,
        stop: impl Fn(&ObjectId) -> bool,
    ) -> anyhow::Result<Vec<ObjectId>> {
        let mut order = Vec::new();
        let mut visited = HashSet::from([tip.clone()]);
        let mut queue = VecDeque::from([tip.clone()]);

        while let Some(commit_id) = queue.pop_front() {
            if stop(&commit_id) {
                continue;
            }

            for parent in self.load(&commit_id)?.parents {
                if visited.insert(parent.clone()) {
                    queue.push_back(parent);
                }
            }
            order.push(commit_id);
        }

        Ok(order)
    }

    /// Set of all ancestors of `tip`, `tip` included
    pub fn ancestor_set(&self, tip: &ObjectId) -> anyhow::Result<HashSet<ObjectId>> {
        Ok(self.walk(tip)?.into_iter().collect())
    }

    pub fn is_ancestor(&self, ancestor: &ObjectId, tip: &ObjectId) -> anyhow::Result<bool> {
        Ok(self.ancestor_set(tip)?.contains(ancestor))
    }

    /// Commits reachable from `tip` but not from `excluded`
    ///
    /// With `excluded` absent this is the full ancestor closure of `tip`.
    pub fn between(
        &self,
        tip: &ObjectId,
        excluded: Option<&ObjectId>,
    ) -> anyhow::Result<Vec<ObjectId>> {
        match excluded {
            None => self.walk(tip),
            Some(excluded) => {
                let known = self.ancestor_set(excluded)?;
                self.walk_until(tip, |commit_id| known.contains(commit_id))
            }
        }
    }
}
