//! User commands
//!
//! Every command is an `impl Repository` block:
//!
//! - `porcelain`: local version control workflows (init, add, commit, merge, ...)
//! - `sync`: remotes and history exchange (push, fetch, pull)

pub mod porcelain;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_support;
