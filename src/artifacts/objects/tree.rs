//! Commit tree
//!
//! A tree maps every tracked, repository-relative file path to the hash of the
//! blob holding its content. It is flat: directories are implied by the paths
//! and never stored as objects of their own.
//!
//! Entries are kept in a `BTreeMap` so iteration (and therefore commit
//! serialization) is always in lexicographic path order.

use crate::areas::workspace::METADATA_DIR;
use crate::artifacts::core::TwigError;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<PathBuf, ObjectId>,
}

impl Tree {
    pub fn new(entries: BTreeMap<PathBuf, ObjectId>) -> Self {
        Tree { entries }
    }

    pub fn get(&self, path: &Path) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn insert(&mut self, path: PathBuf, oid: ObjectId) -> Option<ObjectId> {
        self.entries.insert(path, oid)
    }

    pub fn remove(&mut self, path: &Path) -> Option<ObjectId> {
        self.entries.remove(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.keys()
    }

    pub fn blobs(&self) -> impl Iterator<Item = &ObjectId> {
        self.entries.values()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, PathBuf, ObjectId> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fail unless `path` names a file inside the working tree
    ///
    /// Only plain components are allowed, and the metadata directory is off
    /// limits.
    pub fn check_path(path: &Path) -> anyhow::Result<()> {
        let mut components = path.components().peekable();
        let inside = components.peek().is_some_and(|first| {
            first.as_os_str() != METADATA_DIR && matches!(first, Component::Normal(_))
        }) && components.all(|component| matches!(component, Component::Normal(_)));

        if inside {
            Ok(())
        } else {
            Err(TwigError::PathOutsideRepository(path.display().to_string()).into())
        }
    }

    /// Render a tree entry as a `blob <hash> <path>` line
    pub(crate) fn entry_line(path: &Path, oid: &ObjectId) -> anyhow::Result<String> {
        let path = path
            .to_str()
            .with_context(|| format!("non UTF-8 path in tree: {}", path.display()))?;
        if path.contains('\n') {
            anyhow::bail!("path contains a newline: {:?}", path);
        }

        Ok(format!("blob {} {}", oid, path))
    }

    /// Parse a `blob <hash> <path>` line back into a tree entry
    pub(crate) fn parse_entry_line(line: &str) -> anyhow::Result<(PathBuf, ObjectId)> {
        let rest = line
            .strip_prefix("blob ")
            .with_context(|| format!("invalid tree entry: {line}"))?;
        let (oid, path) = rest
            .split_once(' ')
            .with_context(|| format!("invalid tree entry: {line}"))?;

        let path = PathBuf::from(path);
        Self::check_path(&path)?;

        Ok((path, ObjectId::try_parse(oid.to_string())?))
    }
}

impl FromIterator<(PathBuf, ObjectId)> for Tree {
    fn from_iter<I: IntoIterator<Item = (PathBuf, ObjectId)>>(iter: I) -> Self {
        Tree {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Tree {
    type Item = (PathBuf, ObjectId);
    type IntoIter = btree_map::IntoIter<PathBuf, ObjectId>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'t> IntoIterator for &'t Tree {
    type Item = (&'t PathBuf, &'t ObjectId);
    type IntoIter = btree_map::Iter<'t, PathBuf, ObjectId>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
