//! Replication of history between repositories
//!
//! - `object_store`: object access a transfer needs from either side
//! - `transfer`: copy of commits and their blobs, deduplicated at the destination

pub mod object_store;
pub mod transfer;
