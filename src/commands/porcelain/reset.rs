use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Move the current branch and the working tree to an arbitrary commit
    pub async fn reset(&mut self, commit_id: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        let target_oid = Revision::parse(commit_id).resolve(self.database())?;
        let target_commit = self.database().load_commit(&target_oid)?;
        let (_, head_commit) = self.head_commit()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        self.migrate(&index, head_commit.tree(), target_commit.tree())?;
        self.refs().update_head(&target_oid)?;

        index.clear();
        index.write_updates()?;

        Ok(target_oid)
    }
}
