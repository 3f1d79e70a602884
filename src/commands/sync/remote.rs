use crate::areas::repository::Repository;

impl Repository {
    /// Register a remote; the location is validated only when it is used
    pub async fn add_remote(&mut self, name: &str, location: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        self.remotes().add(name, location)
    }

    pub async fn rm_remote(&mut self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        self.remotes().remove(name)
    }
}
