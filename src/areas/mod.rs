//! Persistent repository areas
//!
//! - `database`: content store for blobs and commits
//! - `index`: staging area persistence
//! - `refs`: HEAD, branches and remote-tracking branches
//! - `remotes`: remote registry and handles on remote repositories
//! - `repository`: the store handle aggregating every area
//! - `workspace`: working directory file access

pub mod database;
pub mod index;
pub mod refs;
pub mod remotes;
pub mod repository;
pub mod workspace;
