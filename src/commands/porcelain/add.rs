use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::Object;

impl Repository {
    pub async fn add(&mut self, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let path = Workspace::tracked_path(file)?;
        let blob = self.workspace().parse_blob(&path)?;
        let blob_id = blob.object_id()?;
        let (_, head_commit) = self.head_commit()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        // content HEAD already tracks is in the store
        if head_commit.tree().get(&path) != Some(&blob_id) {
            self.database().store(&blob)?;
        }
        index.add(path, blob_id, head_commit.tree());

        index.write_updates()
    }
}
