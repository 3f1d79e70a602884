//! Staging entry representation
//!
//! Each entry is either a staged addition (path plus the hash of the content
//! that will be committed) or a staged removal (path only).

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{Context, anyhow};
use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Maximum path length supported in staging entries
const MAX_PATH_SIZE: usize = u16::MAX as usize;

const ADDITION_KIND: u8 = 0;
const REMOVAL_KIND: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEntry {
    Addition { path: PathBuf, oid: ObjectId },
    Removal { path: PathBuf },
}

impl IndexEntry {
    pub fn path(&self) -> &Path {
        match self {
            IndexEntry::Addition { path, .. } | IndexEntry::Removal { path } => path,
        }
    }

    /// Read the next entry from a staging file
    pub(crate) fn read_from(reader: &mut Checksum) -> anyhow::Result<Self> {
        let kind = reader.read(1)?[0];
        let path_len = NetworkEndian::read_u16(&reader.read(2)?) as usize;
        let path = String::from_utf8(reader.read(path_len)?.to_vec())
            .context("Invalid path in staging entry")?;
        let path = PathBuf::from(path);

        match kind {
            ADDITION_KIND => {
                let oid = ObjectId::read_h40_from(&mut reader.read(20)?.as_ref())?;
                Ok(IndexEntry::Addition { path, oid })
            }
            REMOVAL_KIND => Ok(IndexEntry::Removal { path }),
            other => Err(anyhow!("Invalid staging entry kind: {other}")),
        }
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let path = self
            .path()
            .to_str()
            .with_context(|| format!("non UTF-8 path: {}", self.path().display()))?;
        if path.len() > MAX_PATH_SIZE {
            return Err(anyhow!("Path too long for staging entry: {path}"));
        }

        let mut bytes = Vec::new();
        let kind = match self {
            IndexEntry::Addition { .. } => ADDITION_KIND,
            IndexEntry::Removal { .. } => REMOVAL_KIND,
        };
        bytes.write_u8(kind)?;
        bytes.write_u16::<NetworkEndian>(path.len() as u16)?;
        bytes.write_all(path.as_bytes())?;

        if let IndexEntry::Addition { oid, .. } = self {
            oid.write_h40_to(&mut bytes)?;
        }

        Ok(Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_entries_carry_no_hash() {
        let entry = IndexEntry::Removal {
            path: PathBuf::from("a.txt"),
        };

        let bytes = entry.serialize().unwrap();
        assert_eq!(bytes.as_ref(), b"\x01\x00\x05a.txt");
    }

    #[test]
    fn addition_entries_end_with_the_packed_hash() {
        let entry = IndexEntry::Addition {
            path: PathBuf::from("b"),
            oid: ObjectId::try_parse("ab".repeat(20)).unwrap(),
        };

        let bytes = entry.serialize().unwrap();
        assert_eq!(bytes.len(), 1 + 2 + 1 + 20);
        assert_eq!(&bytes[..4], b"\x00\x00\x01b");
        assert!(bytes[4..].iter().all(|b| *b == 0xab));
    }
}
