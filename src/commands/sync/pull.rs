use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::commands::porcelain::merge::MergeOutcome;

impl Repository {
    /// Fetch a remote branch, then merge its remote-tracking branch
    pub async fn pull(&mut self, remote: &str, branch: &str) -> anyhow::Result<MergeOutcome> {
        self.fetch(remote, branch).await?;

        let tracking_branch =
            BranchName::tracking(remote, &BranchName::try_parse(branch.to_string())?)?;
        self.merge(tracking_branch.as_ref()).await
    }
}
