use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::TwigError;

impl Repository {
    /// Unstage a file, or stage the removal of a file HEAD tracks
    ///
    /// A staged removal also deletes the working file.
    pub async fn rm(&mut self, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let path = Workspace::tracked_path(file)?;
        let (_, head_commit) = self.head_commit()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if !index.unstage(&path) {
            if !head_commit.tree().contains(&path) {
                return Err(TwigError::NothingToRemove.into());
            }

            index.mark_removed(path.clone());
            self.workspace().remove_file(&path)?;
        }

        index.write_updates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::core::error::twig_error;
    use crate::commands::test_support::*;
    use assert_fs::prelude::*;

    #[tokio::test]
    async fn staged_files_are_only_unstaged() {
        let (dir, mut repository) = initialized_repository().await;
        write(&dir, "f", "x");
        repository.add("f").await.unwrap();

        repository.rm("f").await.unwrap();

        assert!(dir.child("f").exists());
        let err = repository.commit("c").await.unwrap_err();
        assert_eq!(twig_error(&err), Some(&TwigError::NothingStaged));
    }

    #[tokio::test]
    async fn tracked_files_are_staged_for_removal_and_deleted() {
        let (dir, mut repository) = initialized_repository().await;
        commit_files(&mut repository, &dir, &[("f", "x")], "c1").await;

        repository.rm("f").await.unwrap();

        assert!(!dir.child("f").exists());
        let commit_id = repository.commit("remove f").await.unwrap();
        let commit = repository.database().load_commit(&commit_id).unwrap();
        assert!(commit.tree().is_empty());
    }

    #[tokio::test]
    async fn unknown_files_have_nothing_to_remove() {
        let (dir, mut repository) = initialized_repository().await;
        write(&dir, "stray", "x");

        let err = repository.rm("stray").await.unwrap_err();
        assert_eq!(twig_error(&err), Some(&TwigError::NothingToRemove));
    }
}
