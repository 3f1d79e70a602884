//! Remote registry and remote repository handles
//!
//! A remote is a name bound to the path of another repository's metadata
//! directory, stored verbatim in `remotes/<name>`. The path is only resolved
//! and validated when a remote is used, relative to the working tree root.

use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::artifacts::core::TwigError;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Registry of named remotes rooted at `.twig/remotes`
#[derive(Debug)]
pub struct Remotes {
    path: Box<Path>,
}

impl Remotes {
    pub fn new(path: Box<Path>) -> Self {
        Remotes { path }
    }

    pub fn init(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.path)
            .with_context(|| format!("Unable to create remotes directory {:?}", self.path))
    }

    pub fn add(&self, name: &str, location: &str) -> anyhow::Result<()> {
        let remote_path = self.remote_path(name)?;
        if remote_path.exists() {
            return Err(TwigError::RemoteExists.into());
        }

        std::fs::create_dir_all(&self.path)?;
        std::fs::write(&remote_path, location)
            .with_context(|| format!("Unable to write remote {name}"))
    }

    pub fn remove(&self, name: &str) -> anyhow::Result<()> {
        let remote_path = self.remote_path(name)?;
        if !remote_path.is_file() {
            return Err(TwigError::NoSuchRemote.into());
        }

        std::fs::remove_file(&remote_path).with_context(|| format!("Unable to remove remote {name}"))
    }

    /// Location a remote was registered with, verbatim
    pub fn location(&self, name: &str) -> anyhow::Result<String> {
        let remote_path = self.remote_path(name)?;
        if !remote_path.is_file() {
            return Err(TwigError::NoSuchRemote.into());
        }

        let location = std::fs::read_to_string(&remote_path)
            .with_context(|| format!("Unable to read remote {name}"))?;
        Ok(location.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Open the repository a remote points at
    ///
    /// Relative locations are resolved against `base`, the local working tree
    /// root. Fails with `RemoteNotFound` unless the location holds an object
    /// store and a ref namespace.
    pub fn open(&self, name: &str, base: &Path) -> anyhow::Result<RemoteRepository> {
        let location = PathBuf::from(self.location(name)?);
        let root = if location.is_absolute() {
            location
        } else {
            base.join(location)
        };

        RemoteRepository::open(&root)
    }

    // Names are single path components so a remote can't escape the registry.
    fn remote_path(&self, name: &str) -> anyhow::Result<PathBuf> {
        let is_plain = !name.is_empty()
            && Path::new(name).components().count() == 1
            && !matches!(name, "." | "..");
        if !is_plain {
            return Err(TwigError::Usage.into());
        }

        Ok(self.path.join(name))
    }
}

/// Object store and refs of another repository reachable on the filesystem
#[derive(Debug)]
pub struct RemoteRepository {
    database: Database,
    refs: Refs,
}

impl RemoteRepository {
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        if !root.join("objects").is_dir() || !root.join("refs").is_dir() {
            return Err(TwigError::RemoteNotFound.into());
        }

        Ok(RemoteRepository {
            database: Database::new(root.join("objects").into_boxed_path()),
            refs: Refs::new(root.to_path_buf().into_boxed_path()),
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
