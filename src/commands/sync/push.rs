use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::TwigError;
use crate::artifacts::log::ancestry::Ancestry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::sync::transfer::{Transfer, TransferStats};

impl Repository {
    /// Copy the current branch's history to `branch` on a remote
    ///
    /// An existing remote branch must be an ancestor of the local tip,
    /// otherwise the push fails with `NonFastForward`. Only the commits the
    /// remote branch lacks are copied.
    pub async fn push(&mut self, remote: &str, branch: &str) -> anyhow::Result<TransferStats> {
        self.ensure_initialized()?;

        let remote_repository = self.remotes().open(remote, self.path())?;
        let branch_name = BranchName::try_parse(branch.to_string())?;
        let local_tip = self.refs().read_head()?;

        let database = self.database();
        let ancestry = Ancestry::new(|oid: &ObjectId| database.load_slim_commit(oid));

        let commits = match remote_repository.refs().read_local_branch(&branch_name)? {
            None => ancestry.between(&local_tip, None)?,
            Some(remote_tip) => {
                if !ancestry.is_ancestor(&remote_tip, &local_tip)? {
                    return Err(TwigError::NonFastForward.into());
                }
                ancestry.between(&local_tip, Some(&remote_tip))?
            }
        };

        let stats = Transfer::new(database, remote_repository.database()).copy_commits(&commits)?;
        remote_repository
            .refs()
            .update_branch(&branch_name, &local_tip)?;

        eprintln!(
            "Pushed {} to {}/{}: {}",
            local_tip.to_short_oid(),
            remote,
            branch_name,
            stats
        );

        Ok(stats)
    }
}
