//! Local version control commands
//!
//! - `init`: create a repository
//! - `add` / `rm`: stage additions and removals
//! - `commit`: record the staged changes
//! - `log`: current branch history, every commit, commits by message
//! - `status`: branches, staged changes and working tree changes
//! - `checkout`: restore files or switch branches
//! - `branch`: create and delete branches
//! - `reset`: move the current branch to any commit
//! - `merge`: three-way merge of another branch

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
