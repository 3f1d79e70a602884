use crate::areas::repository::Repository;
use crate::artifacts::core::TwigError;
use crate::artifacts::objects::commit::{Commit, Parents};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::io::Write;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        if message.trim().is_empty() {
            return Err(TwigError::EmptyMessage.into());
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if index.is_empty() {
            return Err(TwigError::NothingStaged.into());
        }

        let (head_oid, head_commit) = self.head_commit()?;
        let tree = index.apply_to(head_commit.tree());
        let commit_id = self.write_commit(Parents::Normal(head_oid), tree, message.to_string())?;

        index.clear();
        index.write_updates()?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            self.refs().current_branch()?,
            commit_id.to_short_oid(),
            message.lines().next().unwrap_or_default()
        )?;

        Ok(commit_id)
    }

    /// Store a commit and advance the current branch to it
    pub(crate) fn write_commit(
        &self,
        parents: Parents,
        tree: Tree,
        message: String,
    ) -> anyhow::Result<ObjectId> {
        let commit = Commit::new(parents, Commit::timestamp_from_env(), tree, message);
        let commit_id = self.database().store(&commit)?;
        self.refs().update_head(&commit_id)?;

        Ok(commit_id)
    }
}
