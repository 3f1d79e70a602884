use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::TwigError;
use crate::artifacts::objects::commit::Commit;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    /// Create the metadata layout with the shared root commit on `master`
    pub async fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(TwigError::AlreadyInitialized.into());
        }

        fs::create_dir_all(self.twig_path()).context("Failed to create .twig directory")?;
        self.database()
            .init()
            .context("Failed to create .twig/objects directory")?;
        self.refs()
            .init()
            .context("Failed to create .twig/refs directory")?;
        self.remotes()
            .init()
            .context("Failed to create .twig/remotes directory")?;

        let root_oid = self.database().store(&Commit::root())?;
        let default_branch = BranchName::default_branch();
        self.refs().update_branch(&default_branch, &root_oid)?;
        self.refs()
            .set_head(&default_branch)
            .context("Failed to create initial HEAD reference")?;

        let index = self.index();
        let mut index = index.lock().await;
        index.clear();
        index
            .write_updates()
            .context("Failed to create .twig/index file")?;

        writeln!(
            self.writer(),
            "Initialized empty Twig repository in {}",
            self.twig_path().display()
        )?;

        Ok(())
    }
}
