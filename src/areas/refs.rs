//! References (HEAD, branches, remote-tracking branches)
//!
//! References are human-readable names pointing to commits.
//!
//! ## Reference Types
//!
//! - HEAD: symbolic reference naming the current branch (`ref: refs/heads/<branch>`)
//! - Branches: `refs/heads/<branch>` holding the branch tip commit id
//! - Remote-tracking branches: `refs/remotes/<remote>/<branch>`, written by fetch
//!
//! ## File Format
//!
//! Branch refs are text files containing a 40-character hex commit id.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::TwigError;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// References manager rooted at a repository's metadata directory
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.twig`)
    path: Box<Path>,
}

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

impl Refs {
    /// Create the ref namespaces
    pub fn init(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(self.heads_path())?;
        std::fs::create_dir_all(self.remotes_path())?;
        Ok(())
    }

    /// Name of the branch HEAD points at
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;
        let content = content.trim();

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(content)
            .with_context(|| format!("HEAD is not a branch reference: {content}"))?;

        BranchName::try_parse(symref_match[1].to_string())
    }

    /// Point HEAD at a local branch
    pub fn set_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(
            self.head_path(),
            format!("ref: refs/heads/{}", branch_name),
        )
    }

    /// Commit id of the current branch tip
    pub fn read_head(&self) -> anyhow::Result<ObjectId> {
        let branch_name = self.current_branch()?;
        self.read_local_branch(&branch_name)?
            .with_context(|| format!("current branch {branch_name} has no commit"))
    }

    /// Advance the current branch to a new commit
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let branch_name = self.current_branch()?;
        self.update_branch(&branch_name, oid)
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.current_branch()? == branch_name)
    }

    /// Tip of a branch: local branches first, then remote-tracking branches
    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        match self.read_local_branch(branch_name)? {
            Some(oid) => Ok(Some(oid)),
            None => self.read_ref_file(&self.remotes_path().join(branch_name.as_ref())),
        }
    }

    /// Tip of a local branch, ignoring remote-tracking branches
    pub fn read_local_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref_file(&self.heads_path().join(branch_name.as_ref()))
    }

    pub fn local_branch_exists(&self, branch_name: &BranchName) -> bool {
        self.heads_path().join(branch_name.as_ref()).is_file()
    }

    pub fn create_branch(&self, name: &BranchName, source_oid: &ObjectId) -> anyhow::Result<()> {
        if self.local_branch_exists(name) {
            return Err(TwigError::BranchExists.into());
        }

        self.update_branch(name, source_oid)
    }

    pub fn update_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(
            self.heads_path().join(name.as_ref()).into_boxed_path(),
            oid.to_string(),
        )
    }

    /// Record the last known tip of `branch` on `remote`
    pub fn update_tracking_ref(
        &self,
        remote: &str,
        branch: &BranchName,
        oid: &ObjectId,
    ) -> anyhow::Result<()> {
        self.update_ref_file(
            self.remotes_path()
                .join(remote)
                .join(branch.as_ref())
                .into_boxed_path(),
            oid.to_string(),
        )
    }

    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        let branch_path = self.heads_path().join(name.as_ref());

        match self.read_ref_file(&branch_path)? {
            Some(oid) => {
                std::fs::remove_file(&branch_path).with_context(|| {
                    format!("failed to delete branch file at {:?}", branch_path)
                })?;
                self.prune_branch_empty_parent_dirs(&branch_path)?;

                Ok(oid)
            }
            None => Err(TwigError::NoSuchBranch.into()),
        }
    }

    /// Local branches, sorted by name
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();
        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                BranchName::try_parse(relative_path.to_string_lossy().to_string()).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    pub fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.clone())
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    fn read_ref_file(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;
        let content = content.trim();

        if content.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ObjectId::try_parse(content.to_string())?))
        }
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_path()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    pub fn remotes_path(&self) -> PathBuf {
        self.refs_path().join("remotes")
    }
}
