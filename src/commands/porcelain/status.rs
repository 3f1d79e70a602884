use crate::areas::repository::Repository;

impl Repository {
    pub async fn status(&mut self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let status_info = self.status_report().initialize(&index)?;
        let mut writer = self.writer();
        status_info.write_to(writer.as_mut())
    }
}
