//! Staging area
//!
//! The staging area holds the net difference between HEAD's tree and the next
//! commit: files staged for addition (with the hash of their staged content)
//! and files staged for removal.
//!
//! ## Invariants
//!
//! - A path is never in both `additions` and `removals`
//! - A staged addition never repeats the hash HEAD already tracks for that path
//!
//! ## Lifetime
//!
//! The staging area is loaded at the start of a command (`rehydrate`), mutated
//! in memory, and saved at the end (`write_updates`). It is never held across
//! commands.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use anyhow::anyhow;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the staging file (typically `.twig/index`)
    path: Box<Path>,
    /// Files staged for addition, mapped to the hash of their staged content
    additions: BTreeMap<PathBuf, ObjectId>,
    /// Files staged for removal
    removals: BTreeSet<PathBuf>,
    /// Flag indicating if the staging area has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the staging area from disk
    ///
    /// A missing or zero-length file is an empty staging area.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the staging file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();
        self.changed = false;

        if !self.path().exists() {
            std::fs::File::create(self.path())?;
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock);
        let entries_count = Self::parse_header(&mut reader)?;

        for _ in 0..entries_count {
            match IndexEntry::read_from(&mut reader)? {
                IndexEntry::Addition { path, oid } => {
                    self.additions.insert(path, oid);
                }
                IndexEntry::Removal { path } => {
                    self.removals.insert(path);
                }
            }
        }

        reader.verify()
    }

    fn parse_header(reader: &mut Checksum) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = IndexHeader::deserialize(std::io::Cursor::new(header_bytes))?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid index file signature"));
        }

        if header.version != VERSION {
            return Err(anyhow!(
                "Unsupported index file version: {}",
                header.version
            ));
        }

        Ok(header.entries_count)
    }

    /// Persist the staging area, if it changed since it was loaded
    ///
    /// # Locking
    ///
    /// Acquires an exclusive lock on the staging file during writing.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = Checksum::new(lock);

        let entries = self.entries();
        let header = IndexHeader::with_count(entries.len() as u32);
        writer.write(&header.serialize()?)?;

        for entry in entries {
            writer.write(&entry.serialize()?)?;
        }

        writer.write_checksum()?;
        self.changed = false;

        Ok(())
    }

    /// Stage `path` with content hash `oid`, keeping the net-diff invariant
    ///
    /// If HEAD already tracks exactly this content, the path reverts to its
    /// untouched state instead.
    pub fn add(&mut self, path: PathBuf, oid: ObjectId, head_tree: &Tree) {
        self.removals.remove(&path);

        if head_tree.get(&path) == Some(&oid) {
            self.additions.remove(&path);
        } else {
            self.additions.insert(path, oid);
        }

        self.changed = true;
    }

    /// Drop a staged addition, returning whether one was present
    pub fn unstage(&mut self, path: &Path) -> bool {
        let removed = self.additions.remove(path).is_some();
        self.changed |= removed;
        removed
    }

    pub fn mark_removed(&mut self, path: PathBuf) {
        self.additions.remove(&path);
        self.removals.insert(path);
        self.changed = true;
    }

    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
        self.changed = true;
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn additions(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeSet<PathBuf> {
        &self.removals
    }

    pub fn is_staged_for_addition(&self, path: &Path) -> bool {
        self.additions.contains_key(path)
    }

    pub fn is_staged_for_removal(&self, path: &Path) -> bool {
        self.removals.contains(path)
    }

    /// Tree of the next commit: `base` with additions merged in and removals deleted
    pub fn apply_to(&self, base: &Tree) -> Tree {
        let mut tree = base.clone();

        for (path, oid) in &self.additions {
            tree.insert(path.clone(), oid.clone());
        }
        for path in &self.removals {
            tree.remove(path);
        }

        tree
    }

    fn entries(&self) -> Vec<IndexEntry> {
        let additions = self
            .additions
            .iter()
            .map(|(path, oid)| IndexEntry::Addition {
                path: path.clone(),
                oid: oid.clone(),
            });
        let removals = self
            .removals
            .iter()
            .map(|path| IndexEntry::Removal { path: path.clone() });

        additions.chain(removals).collect()
    }
}
