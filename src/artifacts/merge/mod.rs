//! Three-way merge
//!
//! - `split_point`: first-hit BFS split point search and fast-forward detection
//! - `resolution`: per-path resolution rules over split point, ours and theirs
//! - `conflict`: content of conflicted files

pub mod conflict;
pub mod resolution;
pub mod split_point;
