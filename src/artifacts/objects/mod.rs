//! Object types and operations
//!
//! All content is stored as objects identified by SHA-1 hashes. There are two types:
//!
//! - **Blob**: File content (raw bytes)
//! - **Commit**: Snapshot with metadata (parents, timestamp, message) and the
//!   full path to blob mapping of tracked files
//!
//! All objects implement serialization/deserialization for the object format:
//! `<type> <size>\0<content>`

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
