//! Object transfer between two stores
//!
//! A transfer copies a list of commits, computed on whichever side knows the
//! history, together with every blob their trees reference. Blobs are copied
//! before commits so a commit present at the destination always has its
//! content. Objects already present at the destination are skipped.

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::sync::object_store::ObjectStore;
use std::collections::BTreeSet;

/// Number of objects a transfer actually wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    pub commits: usize,
    pub blobs: usize,
}

impl std::fmt::Display for TransferStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} commit(s), {} blob(s)", self.commits, self.blobs)
    }
}

pub struct Transfer<'s, Source, Destination>
where
    Source: ObjectStore + ?Sized,
    Destination: ObjectStore + ?Sized,
{
    source: &'s Source,
    destination: &'s Destination,
}

impl<'s, Source, Destination> Transfer<'s, Source, Destination>
where
    Source: ObjectStore + ?Sized,
    Destination: ObjectStore + ?Sized,
{
    pub fn new(source: &'s Source, destination: &'s Destination) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Copy `commits` and the blobs they reference
    pub fn copy_commits(&self, commits: &[ObjectId]) -> anyhow::Result<TransferStats> {
        let mut stats = TransferStats::default();

        let missing_commits = commits
            .iter()
            .filter(|oid| !self.destination.contains(ObjectType::Commit, oid))
            .map(|oid| Ok((oid.clone(), self.source.read_commit(oid)?)))
            .collect::<anyhow::Result<Vec<(ObjectId, Commit)>>>()?;

        let blobs = missing_commits
            .iter()
            .flat_map(|(_, commit)| commit.tree().blobs().cloned())
            .collect::<BTreeSet<_>>();

        for blob in &blobs {
            if self.copy_object(ObjectType::Blob, blob)? {
                stats.blobs += 1;
            }
        }

        for (oid, _) in &missing_commits {
            if self.copy_object(ObjectType::Commit, oid)? {
                stats.commits += 1;
            }
        }

        Ok(stats)
    }

    fn copy_object(&self, object_type: ObjectType, object_id: &ObjectId) -> anyhow::Result<bool> {
        if self.destination.contains(object_type, object_id) {
            return Ok(false);
        }

        debug_sync_log!("transfer: copying {} {}", object_type, object_id.to_short_oid());
        let content = self.source.read_raw(object_type, object_id)?;
        self.destination.write_raw(object_type, object_id, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::database::Database;
    use crate::artifacts::log::ancestry::Ancestry;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::commit::Parents;
    use crate::artifacts::objects::tree::Tree;
    use assert_fs::TempDir;
    use bytes::Bytes;
    use std::path::PathBuf;

    fn database(dir: &TempDir, name: &str) -> Database {
        let database = Database::new(dir.path().join(name).into_boxed_path());
        database.init().unwrap();
        database
    }

    fn commit_with(
        database: &Database,
        parent: ObjectId,
        files: &[(&str, &'static str)],
        message: &str,
    ) -> ObjectId {
        let tree = files
            .iter()
            .map(|(path, content)| {
                let oid = database
                    .store(&Blob::new(Bytes::from_static(content.as_bytes())))
                    .unwrap();
                (PathBuf::from(path), oid)
            })
            .collect::<Tree>();

        database
            .store(&Commit::new(
                Parents::Normal(parent),
                Commit::root().timestamp(),
                tree,
                message.to_string(),
            ))
            .unwrap()
    }

    #[test]
    fn copies_history_with_its_blobs_once() {
        let dir = TempDir::new().unwrap();
        let source = database(&dir, "source");
        let destination = database(&dir, "destination");

        let root = source.store(&Commit::root()).unwrap();
        let first = commit_with(&source, root, &[("a", "a"), ("b", "b")], "first");
        let second = commit_with(&source, first, &[("a", "a"), ("b", "b2")], "second");

        let ancestry = Ancestry::new(|oid: &ObjectId| source.load_slim_commit(oid));
        let history = ancestry.between(&second, None).unwrap();
        let transfer = Transfer::new(&source, &destination);

        let stats = transfer.copy_commits(&history).unwrap();
        assert_eq!(stats, TransferStats { commits: 3, blobs: 3 });
        assert_eq!(destination.load_commit(&second).unwrap(), source.load_commit(&second).unwrap());

        let again = transfer.copy_commits(&history).unwrap();
        assert_eq!(again, TransferStats::default());
    }

    #[test]
    fn skips_commits_the_destination_already_has() {
        let dir = TempDir::new().unwrap();
        let source = database(&dir, "source");
        let destination = database(&dir, "destination");

        let root = source.store(&Commit::root()).unwrap();
        destination.store(&Commit::root()).unwrap();
        let tip = commit_with(&source, root.clone(), &[("f", "x")], "tip");

        let stats = Transfer::new(&source, &destination)
            .copy_commits(&[tip.clone(), root])
            .unwrap();

        assert_eq!(stats, TransferStats { commits: 1, blobs: 1 });
        assert!(destination.contains(ObjectType::Commit, &tip));
    }
}
