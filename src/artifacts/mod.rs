//! Data types and algorithms
//!
//! - `branch`: branch names and abbreviated commit id resolution
//! - `checkout`: working tree migration between two trees
//! - `core`: error taxonomy and the pager adapter
//! - `index`: binary staging file format
//! - `log`: history walks and ancestor closures
//! - `merge`: split point search, three-way resolution, conflict markers
//! - `objects`: object ids, blobs, commits and trees
//! - `status`: status report model
//! - `sync`: object transfer between repositories

pub mod branch;
pub mod checkout;
pub mod core;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
pub mod sync;
