use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::inspector::Inspector;
use colored::Colorize;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) current_branch: BranchName,
    pub(crate) branches: Vec<BranchName>,
    pub(crate) staged_files: Vec<PathBuf>,
    pub(crate) removed_files: Vec<PathBuf>,
    pub(crate) workspace_changeset: BTreeMap<PathBuf, WorkspaceChangeType>,
    pub(crate) untracked_files: Vec<PathBuf>,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl Status<'_> {
    pub fn initialize(&self, index: &Index) -> anyhow::Result<StatusInfo> {
        let refs = self.repository.refs();
        let (_, head_commit) = self.repository.head_commit()?;
        let inspector = Inspector::new(self.repository.workspace(), head_commit.tree(), index);

        Ok(StatusInfo {
            current_branch: refs.current_branch()?,
            branches: refs.list_branches()?,
            staged_files: index.additions().keys().cloned().collect(),
            removed_files: index.removals().iter().cloned().collect(),
            workspace_changeset: inspector.workspace_changes()?,
            untracked_files: inspector.untracked_files()?,
        })
    }
}

impl StatusInfo {
    pub fn write_to(&self, writer: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(writer, "=== Branches ===")?;
        for branch in &self.branches {
            if branch == &self.current_branch {
                writeln!(writer, "{}", format!("*{branch}").green())?;
            } else {
                writeln!(writer, "{branch}")?;
            }
        }
        writeln!(writer)?;

        Self::write_section(writer, "Staged Files", &self.staged_files)?;
        Self::write_section(writer, "Removed Files", &self.removed_files)?;

        writeln!(writer, "=== Modifications Not Staged For Commit ===")?;
        for (path, change) in &self.workspace_changeset {
            writeln!(writer, "{} {}", path.display(), change)?;
        }
        writeln!(writer)?;

        Self::write_section(writer, "Untracked Files", &self.untracked_files)
    }

    fn write_section(writer: &mut dyn Write, title: &str, paths: &[PathBuf]) -> anyhow::Result<()> {
        writeln!(writer, "=== {title} ===")?;
        for path in paths {
            writeln!(writer, "{}", path.display())?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
