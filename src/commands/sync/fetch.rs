use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::TwigError;
use crate::artifacts::log::ancestry::Ancestry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::sync::transfer::{Transfer, TransferStats};

impl Repository {
    /// Copy a remote branch's history and record its tip as `<remote>/<branch>`
    ///
    /// Neither the working tree nor the current branch is touched.
    pub async fn fetch(&mut self, remote: &str, branch: &str) -> anyhow::Result<TransferStats> {
        self.ensure_initialized()?;

        let remote_repository = self.remotes().open(remote, self.path())?;
        let branch_name = BranchName::try_parse(branch.to_string())
            .map_err(|_| TwigError::NoSuchRemoteBranch)?;
        let remote_tip = remote_repository
            .refs()
            .read_local_branch(&branch_name)?
            .ok_or(TwigError::NoSuchRemoteBranch)?;

        let remote_database = remote_repository.database();
        let commits = Ancestry::new(|oid: &ObjectId| remote_database.load_slim_commit(oid))
            .between(&remote_tip, None)?;

        let stats = Transfer::new(remote_database, self.database()).copy_commits(&commits)?;
        self.refs()
            .update_tracking_ref(remote, &branch_name, &remote_tip)?;

        eprintln!(
            "Fetched {}/{} at {}: {}",
            remote,
            branch_name,
            remote_tip.to_short_oid(),
            stats
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::core::error::twig_error;
    use crate::commands::test_support::*;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    fn tracking_branch() -> BranchName {
        BranchName::try_parse("origin/master".to_string()).unwrap()
    }

    #[tokio::test]
    async fn fetch_records_a_tracking_branch_without_touching_the_tree() {
        let RepositoryPair { dir, mut local, mut remote } = RepositoryPair::with_origin().await;
        let remote_tip =
            commit_files(&mut remote, &dir.child("remote"), &[("f", "remote")], "r1").await;
        let local_tip = local.refs().read_head().unwrap();

        let stats = local.fetch("origin", "master").await.unwrap();

        assert_eq!(stats, TransferStats { commits: 1, blobs: 1 });
        assert_eq!(
            local.refs().read_branch(&tracking_branch()).unwrap(),
            Some(remote_tip)
        );
        assert_eq!(local.refs().read_head().unwrap(), local_tip);
        assert!(!dir.child("local/f").exists());
    }

    #[tokio::test]
    async fn fetching_twice_copies_nothing_new() {
        let RepositoryPair { dir, mut local, mut remote } = RepositoryPair::with_origin().await;
        let remote_dir = dir.child("remote");
        commit_files(&mut remote, &remote_dir, &[("f", "1"), ("g", "2")], "r1").await;
        let remote_tip = commit_files(&mut remote, &remote_dir, &[("f", "3")], "r2").await;

        local.fetch("origin", "master").await.unwrap();
        let commits_after_first = local.database().commit_ids().unwrap();

        let stats = local.fetch("origin", "master").await.unwrap();

        assert_eq!(stats, TransferStats::default());
        assert_eq!(local.database().commit_ids().unwrap(), commits_after_first);
        assert_eq!(
            local.refs().read_branch(&tracking_branch()).unwrap(),
            Some(remote_tip)
        );
    }

    #[tokio::test]
    async fn missing_remote_branches_and_remotes_are_reported() {
        let RepositoryPair {
            dir: _dir,
            mut local,
            ..
        } = RepositoryPair::with_origin().await;

        let err = local.fetch("origin", "missing").await.unwrap_err();
        assert_eq!(twig_error(&err), Some(&TwigError::NoSuchRemoteBranch));

        local.add_remote("nowhere", "../nowhere/.twig").await.unwrap();
        let err = local.fetch("nowhere", "master").await.unwrap_err();
        assert_eq!(twig_error(&err), Some(&TwigError::RemoteNotFound));
    }
}
