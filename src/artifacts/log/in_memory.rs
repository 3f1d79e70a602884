//! In-memory commit graphs for exercising the graph algorithms without a database

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use rstest::fixture;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub(crate) struct InMemoryCommitStore {
    commits: HashMap<ObjectId, Vec<ObjectId>>,
}

impl InMemoryCommitStore {
    pub(crate) fn add_commit(&mut self, commit_id: &ObjectId, parents: &[&ObjectId]) {
        self.commits.insert(
            commit_id.clone(),
            parents.iter().map(|parent| (*parent).clone()).collect(),
        );
    }

    pub(crate) fn load(&self, commit_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        let parents = self
            .commits
            .get(commit_id)
            .ok_or_else(|| anyhow::anyhow!("commit {} not in test store", commit_id))?;

        Ok(SlimCommit {
            oid: commit_id.clone(),
            parents: parents.clone(),
        })
    }
}

/// Deterministic 40-character hex id spelling out `id` in ASCII
pub(crate) fn create_oid(id: &str) -> ObjectId {
    let mut hex_string = id
        .as_bytes()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<String>();

    while hex_string.len() < 40 {
        hex_string.push('0');
    }
    hex_string.truncate(40);

    ObjectId::try_parse(hex_string).unwrap()
}

/// A <- B <- C <- D
#[fixture]
pub(crate) fn linear_history() -> InMemoryCommitStore {
    let mut store = InMemoryCommitStore::default();
    let [a, b, c, d] = ["a", "b", "c", "d"].map(create_oid);

    store.add_commit(&a, &[]);
    store.add_commit(&b, &[&a]);
    store.add_commit(&c, &[&b]);
    store.add_commit(&d, &[&c]);

    store
}

/// ```text
///     A
///    / \
///   B   C
///   |   |
///   D   E
///    \ /
///     F
/// ```
#[fixture]
pub(crate) fn simple_merge() -> InMemoryCommitStore {
    let mut store = InMemoryCommitStore::default();
    let [a, b, c, d, e, f] = ["a", "b", "c", "d", "e", "f"].map(create_oid);

    store.add_commit(&a, &[]);
    store.add_commit(&b, &[&a]);
    store.add_commit(&c, &[&a]);
    store.add_commit(&d, &[&b]);
    store.add_commit(&e, &[&c]);
    store.add_commit(&f, &[&d, &e]);

    store
}

/// ```text
///     A
///    / \
///   B   C
///   |\ /|
///   | X |
///   |/ \|
///   D   E
///   |   |
///   F   G
/// ```
///
/// D merges C into B, E merges B into C: both B and C are best common
/// ancestors of F and G.
#[fixture]
pub(crate) fn criss_cross_merge() -> InMemoryCommitStore {
    let mut store = InMemoryCommitStore::default();
    let [a, b, c, d, e, f, g] = ["a", "b", "c", "d", "e", "f", "g"].map(create_oid);

    store.add_commit(&a, &[]);
    store.add_commit(&b, &[&a]);
    store.add_commit(&c, &[&a]);
    store.add_commit(&d, &[&b, &c]);
    store.add_commit(&e, &[&c, &b]);
    store.add_commit(&f, &[&d]);
    store.add_commit(&g, &[&e]);

    store
}
