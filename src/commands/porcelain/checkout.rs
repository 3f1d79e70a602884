use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::TwigError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::status::inspector::Inspector;
use std::path::Path;

impl Repository {
    /// Restore a working file to its version in HEAD
    pub async fn checkout_file(&mut self, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let (_, head_commit) = self.head_commit()?;
        self.restore_file(&head_commit, &Workspace::tracked_path(file)?)
    }

    /// Restore a working file to its version in the given (possibly abbreviated) commit
    pub async fn checkout_commit_file(&mut self, commit_id: &str, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let commit_oid = Revision::parse(commit_id).resolve(self.database())?;
        let commit = self.database().load_commit(&commit_oid)?;
        self.restore_file(&commit, &Workspace::tracked_path(file)?)
    }

    /// Switch the working tree and HEAD to another local branch
    pub async fn checkout_branch(&mut self, branch: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch.to_string())
            .ok()
            .filter(|branch_name| self.refs().local_branch_exists(branch_name))
            .ok_or(TwigError::NoSuchBranch)?;

        if self.refs().is_current_branch(&branch_name)? {
            return Err(TwigError::AlreadyOnBranch.into());
        }

        let target_oid = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or(TwigError::NoSuchBranch)?;
        let target_commit = self.database().load_commit(&target_oid)?;
        let (_, head_commit) = self.head_commit()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        self.migrate(&index, head_commit.tree(), target_commit.tree())?;

        index.clear();
        index.write_updates()?;
        self.refs().set_head(&branch_name)?;

        eprintln!("Switched to branch '{}'", branch_name);

        Ok(())
    }

    /// Move the working tree from one tree to another
    ///
    /// Aborts with `UntrackedFileConflict` before touching anything if an
    /// untracked working file would be overwritten.
    pub(crate) fn migrate(&self, index: &Index, from: &Tree, to: &Tree) -> anyhow::Result<()> {
        let inspector = Inspector::new(self.workspace(), from, index);
        let migration = Migration::plan(self.database(), from, to);

        migration.check_untracked(&inspector)?;
        self.workspace().apply_migration(&migration)
    }

    fn restore_file(&self, commit: &Commit, path: &Path) -> anyhow::Result<()> {
        let blob_id = commit.tree().get(path).ok_or(TwigError::FileNotInCommit)?;
        let blob = self.database().load_blob(blob_id)?;

        self.workspace().write_file(path, blob.content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::core::error::twig_error;
    use crate::commands::test_support::*;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn files_are_restored_from_head_or_an_abbreviated_commit() {
        let (dir, mut repository) = initialized_repository().await;
        let first = commit_files(&mut repository, &dir, &[("f", "v1")], "c1").await;
        commit_files(&mut repository, &dir, &[("f", "v2")], "c2").await;

        write(&dir, "f", "scratch");
        repository.checkout_file("f").await.unwrap();
        assert_eq!(read(&dir, "f"), "v2");

        repository
            .checkout_commit_file(&first.as_ref()[..8], "f")
            .await
            .unwrap();
        assert_eq!(read(&dir, "f"), "v1");

        let err = repository.checkout_file("missing").await.unwrap_err();
        assert_eq!(twig_error(&err), Some(&TwigError::FileNotInCommit));

        let err = repository
            .checkout_commit_file("0000000", "f")
            .await
            .unwrap_err();
        assert_eq!(twig_error(&err), Some(&TwigError::NoSuchCommit));
    }

    #[tokio::test]
    async fn switching_branches_replaces_the_tracked_files() {
        let (dir, mut repository) = initialized_repository().await;
        repository.branch("empty").await.unwrap();
        commit_files(&mut repository, &dir, &[("nested/f", "x")], "c1").await;

        repository.checkout_branch("empty").await.unwrap();

        assert!(!dir.child("nested").exists());
        assert_eq!(repository.refs().current_branch().unwrap().as_ref(), "empty");

        let err = repository.checkout_branch("empty").await.unwrap_err();
        assert_eq!(twig_error(&err), Some(&TwigError::AlreadyOnBranch));

        let err = repository.checkout_branch("nope").await.unwrap_err();
        assert_eq!(twig_error(&err), Some(&TwigError::NoSuchBranch));
    }

    #[tokio::test]
    async fn untracked_files_in_the_way_block_the_switch() {
        let (dir, mut repository) = initialized_repository().await;
        repository.branch("other").await.unwrap();
        commit_files(&mut repository, &dir, &[("f", "tracked")], "c1").await;
        repository.checkout_branch("other").await.unwrap();
        write(&dir, "f", "untracked");

        let err = repository.checkout_branch("master").await.unwrap_err();

        assert_eq!(twig_error(&err), Some(&TwigError::UntrackedFileConflict));
        assert_eq!(read(&dir, "f"), "untracked");
        assert_eq!(repository.refs().current_branch().unwrap().as_ref(), "other");
    }
}
