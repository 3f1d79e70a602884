//! Staging file format
//!
//! The staging file records the pending additions and removals between the
//! working directory and the next commit.
//!
//! ## File Format
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "TIDX" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - Kind (1 byte): 0 = addition, 1 = removal
//!   - Path length (2 bytes) followed by the UTF-8 path
//!   - Additions only: 20-byte binary blob hash
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```
//!
//! A zero-length file is an empty staging area.

pub mod checksum;
pub mod index_entry;
pub mod index_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of the staging file header in bytes
pub const HEADER_SIZE: usize = 12; // 4 bytes for marker, 4 for version, 4 for entries_count

/// Magic signature identifying staging files
pub const SIGNATURE: &str = "TIDX";

/// Staging file format version
pub const VERSION: u32 = 1;
