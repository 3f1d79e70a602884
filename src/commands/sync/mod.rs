//! Commands exchanging history with other repositories
//!
//! - `remote`: register and forget remotes
//! - `push`: copy the current branch to a remote branch
//! - `fetch`: copy a remote branch into a remote-tracking branch
//! - `pull`: fetch, then merge the remote-tracking branch

pub mod fetch;
pub mod pull;
pub mod push;
pub mod remote;
