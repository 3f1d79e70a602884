use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::path::Path;

pub(crate) async fn initialized_repository() -> (TempDir, Repository) {
    let dir = TempDir::new().unwrap();
    let repository = initialized_repository_at(dir.path()).await;
    (dir, repository)
}

pub(crate) async fn initialized_repository_at(path: &Path) -> Repository {
    let mut repository =
        Repository::new(&path.to_string_lossy(), Box::new(std::io::sink())).unwrap();
    repository.init().await.unwrap();
    repository
}

pub(crate) fn write(dir: &impl PathChild, path: &str, content: &str) {
    dir.child(path).write_str(content).unwrap();
}

pub(crate) fn read(dir: &impl PathChild, path: &str) -> String {
    std::fs::read_to_string(dir.child(path).path()).unwrap()
}

/// Write, stage and commit files in one go
pub(crate) async fn commit_files(
    repository: &mut Repository,
    dir: &impl PathChild,
    files: &[(&str, &str)],
    message: &str,
) -> ObjectId {
    for (path, content) in files {
        write(dir, path, content);
        repository.add(path).await.unwrap();
    }

    repository.commit(message).await.unwrap()
}

/// Two sibling repositories in one scratch directory
pub(crate) struct RepositoryPair {
    pub dir: TempDir,
    pub local: Repository,
    pub remote: Repository,
}

impl RepositoryPair {
    /// `local` and `remote`, with `remote` registered in `local` as `origin`
    pub(crate) async fn with_origin() -> Self {
        let dir = TempDir::new().unwrap();
        let mut local = initialized_repository_at(dir.child("local").path()).await;
        let remote = initialized_repository_at(dir.child("remote").path()).await;
        local.add_remote("origin", "../remote/.twig").await.unwrap();

        RepositoryPair { dir, local, remote }
    }
}
