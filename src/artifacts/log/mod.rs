//! Commit history traversal
//!
//! - `rev_list`: First-parent history walk used by `log`
//! - `ancestry`: Breadth-first ancestor closure used by merge and sync

pub mod ancestry;
#[cfg(test)]
pub(crate) mod in_memory;
pub mod rev_list;
