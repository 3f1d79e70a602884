//! Working tree migration between two trees
//!
//! Moving the working directory from one commit's tree to another (branch
//! checkout, reset, fast-forward) happens in two phases:
//!
//! 1. Plan: every file of the target tree is written, every file tracked by the
//!    source tree but absent from the target is deleted
//! 2. Apply: the workspace executes the plan
//!
//! ## Safety
//!
//! Before anything is touched, an untracked working file that the target
//! tree would overwrite aborts the migration with `UntrackedFileConflict`.

use crate::areas::database::Database;
use crate::artifacts::core::TwigError;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::status::inspector::Inspector;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub struct Migration<'r> {
    database: &'r Database,
    /// Files tracked by the source tree and absent from the target tree
    deletions: BTreeSet<PathBuf>,
    /// Every file of the target tree
    writes: BTreeMap<PathBuf, ObjectId>,
}

impl<'r> Migration<'r> {
    pub fn plan(database: &'r Database, from: &Tree, to: &Tree) -> Self {
        let deletions = from
            .paths()
            .filter(|path| !to.contains(path))
            .cloned()
            .collect();
        let writes = to
            .iter()
            .map(|(path, oid)| (path.clone(), oid.clone()))
            .collect();

        Migration {
            database,
            deletions,
            writes,
        }
    }

    /// Fail if an untracked working file would be overwritten
    pub fn check_untracked(&self, inspector: &Inspector) -> anyhow::Result<()> {
        let target = Tree::from_iter(self.writes.clone());

        if inspector.untracked_in_the_way(&target)?.is_empty() {
            Ok(())
        } else {
            Err(TwigError::UntrackedFileConflict.into())
        }
    }

    pub fn deletions(&self) -> &BTreeSet<PathBuf> {
        &self.deletions
    }

    pub fn writes(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.writes
    }

    pub fn load_blob_data(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        Ok(self.database.load_blob(oid)?.into_content())
    }
}
