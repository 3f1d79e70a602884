//! Checkout operations
//!
//! Switching the working directory between commits is planned as a
//! `Migration` and checked for untracked files in the way before any file
//! is touched.

pub mod migration;
