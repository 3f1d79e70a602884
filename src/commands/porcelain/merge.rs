use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::TwigError;
use crate::artifacts::merge::conflict::conflict_content;
use crate::artifacts::merge::resolution::{Resolution, resolve_trees};
use crate::artifacts::merge::split_point::{MergeBase, SplitPointFinder};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Parents;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::status::inspector::Inspector;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

/// Successful result of a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The current branch moved to the other tip without a new commit
    FastForwarded(ObjectId),
    /// A two-parent commit was created, possibly with conflict markers in it
    Merged { commit: ObjectId, conflicted: bool },
}

impl Repository {
    /// Merge a local or remote-tracking branch into the current branch
    pub async fn merge(&mut self, branch: &str) -> anyhow::Result<MergeOutcome> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if !index.is_empty() {
            return Err(TwigError::UncommittedChanges.into());
        }

        let other_branch =
            BranchName::try_parse(branch.to_string()).map_err(|_| TwigError::NoSuchBranch)?;
        let other_oid = self
            .refs()
            .read_branch(&other_branch)?
            .ok_or(TwigError::NoSuchBranch)?;

        let current_branch = self.refs().current_branch()?;
        if other_branch == current_branch {
            return Err(TwigError::SelfMerge.into());
        }

        let (head_oid, head_commit) = self.head_commit()?;
        let other_commit = self.database().load_commit(&other_oid)?;

        let inspector = Inspector::new(self.workspace(), head_commit.tree(), &index);
        if !inspector
            .untracked_in_the_way(other_commit.tree())?
            .is_empty()
        {
            return Err(TwigError::UntrackedFileConflict.into());
        }

        let database = self.database();
        let merge_base = SplitPointFinder::new(|oid: &ObjectId| database.load_slim_commit(oid))
            .merge_base(&head_oid, &other_oid)?;

        let outcome = match merge_base {
            MergeBase::AlreadyMerged => return Err(TwigError::AlreadyUpToDate.into()),
            MergeBase::FastForward => {
                self.migrate(&index, head_commit.tree(), other_commit.tree())?;
                self.refs().update_head(&other_oid)?;

                writeln!(self.writer(), "Current branch fast-forwarded.")?;
                MergeOutcome::FastForwarded(other_oid)
            }
            MergeBase::SplitPoint(split_oid) => {
                eprintln!(
                    "Merging {} into {} from split point {}",
                    other_oid.to_short_oid(),
                    head_oid.to_short_oid(),
                    split_oid.to_short_oid()
                );

                let split_commit = self.database().load_commit(&split_oid)?;
                let resolutions = resolve_trees(
                    split_commit.tree(),
                    head_commit.tree(),
                    other_commit.tree(),
                );
                let (tree, conflicted) = self.apply_resolutions(resolutions)?;

                let message = format!("Merged {} into {}.", other_branch, current_branch);
                let commit = self.write_commit(Parents::Merge(head_oid, other_oid), tree, message)?;

                if conflicted {
                    writeln!(self.writer(), "Encountered a merge conflict.")?;
                }
                MergeOutcome::Merged { commit, conflicted }
            }
        };

        index.clear();
        index.write_updates()?;

        Ok(outcome)
    }

    /// Carry out per-path resolutions on the working tree
    ///
    /// Returns the merged tree and whether any path conflicted. Conflicted
    /// content is stored so the merge commit's tree is fully resolvable.
    fn apply_resolutions(
        &self,
        resolutions: BTreeMap<PathBuf, Resolution>,
    ) -> anyhow::Result<(Tree, bool)> {
        let mut tree = Tree::default();
        let mut conflicted = false;

        for (path, resolution) in resolutions {
            match resolution {
                Resolution::Keep(oid) => {
                    tree.insert(path, oid);
                }
                Resolution::TakeTheirs(oid) => {
                    let blob = self.database().load_blob(&oid)?;
                    self.workspace().write_file(&path, blob.content())?;
                    tree.insert(path, oid);
                }
                Resolution::Delete => self.workspace().remove_file(&path)?,
                Resolution::Drop => {}
                Resolution::Conflict { ours, theirs } => {
                    let content = conflict_content(
                        &self.blob_content(ours.as_ref())?,
                        &self.blob_content(theirs.as_ref())?,
                    );
                    let oid = self.database().store(&Blob::new(content.clone()))?;
                    self.workspace().write_file(&path, &content)?;
                    tree.insert(path, oid);
                    conflicted = true;
                }
            }
        }

        Ok((tree, conflicted))
    }

    fn blob_content(&self, oid: Option<&ObjectId>) -> anyhow::Result<Bytes> {
        match oid {
            Some(oid) => Ok(self.database().load_blob(oid)?.into_content()),
            None => Ok(Bytes::new()),
        }
    }
}
