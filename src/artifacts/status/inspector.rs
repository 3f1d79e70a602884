use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Compares the working directory against HEAD's tree and the staging area
#[derive(new)]
pub struct Inspector<'r> {
    workspace: &'r Workspace,
    head_tree: &'r Tree,
    index: &'r Index,
}

impl Inspector<'_> {
    /// A working file is untracked when neither HEAD nor the staging area
    /// would carry it into the next commit
    pub fn is_untracked(&self, path: &Path) -> bool {
        (!self.head_tree.contains(path) && !self.index.is_staged_for_addition(path))
            || self.index.is_staged_for_removal(path)
    }

    pub fn untracked_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        Ok(self
            .workspace
            .list_files()?
            .into_iter()
            .filter(|path| self.is_untracked(path))
            .collect())
    }

    /// Untracked working files that `target` would overwrite
    pub fn untracked_in_the_way(&self, target: &Tree) -> anyhow::Result<Vec<PathBuf>> {
        Ok(self
            .untracked_files()?
            .into_iter()
            .filter(|path| target.contains(path))
            .collect())
    }

    /// Modifications not staged for commit
    ///
    /// - tracked in HEAD, changed in the working tree, not staged
    /// - staged for addition with content different from the working file
    /// - staged for addition but deleted from the working tree
    /// - tracked in HEAD, not staged for removal, deleted from the working tree
    pub fn workspace_changes(&self) -> anyhow::Result<BTreeMap<PathBuf, WorkspaceChangeType>> {
        let mut changes = BTreeMap::new();

        for (path, staged_oid) in self.index.additions() {
            if let Some(change) = self.compare_with_workspace(path, staged_oid)? {
                changes.insert(path.clone(), change);
            }
        }

        for (path, head_oid) in self.head_tree {
            if self.index.is_staged_for_addition(path) || self.index.is_staged_for_removal(path) {
                continue;
            }
            if let Some(change) = self.compare_with_workspace(path, head_oid)? {
                changes.insert(path.clone(), change);
            }
        }

        Ok(changes)
    }

    fn compare_with_workspace(
        &self,
        path: &Path,
        expected: &ObjectId,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        if !self.workspace.exists(path) {
            return Ok(Some(WorkspaceChangeType::Deleted));
        }

        let oid = self.workspace.parse_blob(path)?.object_id()?;
        if &oid != expected {
            Ok(Some(WorkspaceChangeType::Modified))
        } else {
            Ok(None)
        }
    }
}
