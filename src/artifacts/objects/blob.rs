//! Blob object
//!
//! Blobs store file content. They contain only the raw file data,
//! without any metadata like filename (paths live in the commit tree).
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`
//! In memory: Just the content bytes

use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

/// Immutable file content, identified by the hash of its bytes
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(with_header(self.object_type(), &self.content))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Self::new(Bytes::from(content)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_type::ObjectType;
    use proptest::prelude::*;
    use std::io::Cursor;

    proptest! {
        #[test]
        fn identical_bytes_hash_identically(content in proptest::collection::vec(any::<u8>(), 0..256)) {
            let first = Blob::new(Bytes::from(content.clone()));
            let second = Blob::new(Bytes::from(content));

            prop_assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        }

        #[test]
        fn serialized_blob_parses_back(content in proptest::collection::vec(any::<u8>(), 0..256)) {
            let blob = Blob::new(Bytes::from(content));
            let mut reader = Cursor::new(blob.serialize().unwrap());

            let object_type = ObjectType::parse_object_type(&mut reader).unwrap();
            prop_assert_eq!(object_type, ObjectType::Blob);
            prop_assert_eq!(Blob::deserialize(reader).unwrap(), blob);
        }
    }

    #[test]
    fn different_content_gives_different_ids() {
        let x = Blob::new(Bytes::from_static(b"x"));
        let y = Blob::new(Bytes::from_static(b"y"));

        assert_ne!(x.object_id().unwrap(), y.object_id().unwrap());
    }
}
