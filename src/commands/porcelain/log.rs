use crate::areas::repository::Repository;
use crate::artifacts::core::TwigError;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::{Commit, Parents};
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// History of the current branch, following first parents
    pub async fn log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let head_oid = self.refs().read_head()?;
        for entry in RevList::new(self.database(), head_oid) {
            let (commit_id, commit) = entry?;
            self.show_commit(&commit_id, &commit, true)?;
        }

        Ok(())
    }

    /// Every commit ever stored, in id order
    pub async fn global_log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        for commit_id in self.database().commit_ids()? {
            let commit = self.database().load_commit(&commit_id)?;
            self.show_commit(&commit_id, &commit, false)?;
        }

        Ok(())
    }

    /// Ids of the commits whose message is exactly `message`
    pub async fn find(&self, message: &str) -> anyhow::Result<Vec<ObjectId>> {
        self.ensure_initialized()?;

        let mut found = Vec::new();
        for commit_id in self.database().commit_ids()? {
            if self.database().load_commit(&commit_id)?.message() == message {
                writeln!(self.writer(), "{commit_id}")?;
                found.push(commit_id);
            }
        }

        if found.is_empty() {
            return Err(TwigError::NoCommitWithMessage.into());
        }

        Ok(found)
    }

    fn show_commit(
        &self,
        commit_id: &ObjectId,
        commit: &Commit,
        with_merge_parents: bool,
    ) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "{}", format!("commit {commit_id}").yellow())?;
        if with_merge_parents && let Parents::Merge(first, second) = commit.parents() {
            writeln!(
                writer,
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::core::error::twig_error;
    use crate::commands::test_support::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn finds_every_commit_with_the_exact_message() {
        let (dir, mut repository) = initialized_repository().await;
        let first = commit_files(&mut repository, &dir, &[("f", "1")], "same").await;
        let second = commit_files(&mut repository, &dir, &[("f", "2")], "same").await;
        commit_files(&mut repository, &dir, &[("f", "3")], "same but longer").await;

        let mut expected = vec![first, second];
        expected.sort();
        assert_eq!(repository.find("same").await.unwrap(), expected);

        let err = repository.find("absent").await.unwrap_err();
        assert_eq!(twig_error(&err), Some(&TwigError::NoCommitWithMessage));
    }
}
