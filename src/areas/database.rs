//! Content store
//!
//! Objects are stored zlib-compressed under `objects/<kind>/<oid>`, one flat
//! directory per object kind (`blobs`, `commit`). Writes go through a temp
//! file and a rename, and an object that already exists is never rewritten,
//! so storing the same content twice is a no-op.

use crate::artifacts::core::TwigError;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, Unpackable, hash_object_bytes};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Create the per-kind object directories
    pub fn init(&self) -> anyhow::Result<()> {
        for object_type in [ObjectType::Blob, ObjectType::Commit] {
            let dir = self.path.join(object_type.dir_name());
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Unable to create object directory {}", dir.display()))?;
        }

        Ok(())
    }

    /// Store an object, returning its id
    ///
    /// Idempotent: an object already present is left untouched.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;

        if !self.exists(object.object_type(), &object_id) {
            self.write_object(
                self.object_path(object.object_type(), &object_id),
                object.serialize()?,
            )?;
        }

        Ok(object_id)
    }

    pub fn exists(&self, object_type: ObjectType, object_id: &ObjectId) -> bool {
        self.object_path(object_type, object_id).is_file()
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let object_reader = self.parse_object_as_bytes(ObjectType::Blob, object_id)?;
        Blob::deserialize(object_reader)
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let object_reader = self.parse_object_as_bytes(ObjectType::Commit, object_id)?;
        Commit::deserialize(object_reader)
    }

    pub fn load_slim_commit(&self, object_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        Ok(self.load_commit(object_id)?.to_slim(object_id.clone()))
    }

    /// Read the serialized (uncompressed) bytes of an object
    pub fn load_raw(&self, object_type: ObjectType, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.object_path(object_type, object_id);
        if !object_path.is_file() {
            return Err(TwigError::ObjectNotFound(object_id.clone()).into());
        }

        self.read_object(object_path)
    }

    /// Write serialized object bytes read from another store
    ///
    /// Returns whether the object was new to this store. Bytes whose digest
    /// is not `object_id` are refused.
    pub fn store_raw(
        &self,
        object_type: ObjectType,
        object_id: &ObjectId,
        content: Bytes,
    ) -> anyhow::Result<bool> {
        if self.exists(object_type, object_id) {
            return Ok(false);
        }

        let mut reader = Cursor::new(content.clone());
        let stored_type = ObjectType::parse_object_type(&mut reader)?;
        if stored_type != object_type {
            anyhow::bail!("object {object_id} is a {stored_type}, expected a {object_type}");
        }
        let actual_id = hash_object_bytes(&content)?;
        if &actual_id != object_id {
            anyhow::bail!("object {object_id} does not match its content (hashes to {actual_id})");
        }

        self.write_object(self.object_path(object_type, object_id), content)?;
        Ok(true)
    }

    /// Ids of every stored commit, sorted
    pub fn commit_ids(&self) -> anyhow::Result<Vec<ObjectId>> {
        let dir = self.path.join(ObjectType::Commit.dir_name());
        if !dir.is_dir() {
            return Ok(vec![]);
        }

        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let file_name = entry?.file_name();
            // skip temp files left behind by interrupted writes
            if let Ok(oid) = ObjectId::try_parse(file_name.to_string_lossy().to_string()) {
                ids.push(oid);
            }
        }
        ids.sort();

        Ok(ids)
    }

    /// Find all commits whose id starts with the given prefix
    ///
    /// Used to resolve abbreviated commit ids. More than one match means the
    /// prefix is ambiguous.
    pub fn find_commits_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        Ok(self
            .commit_ids()?
            .into_iter()
            .filter(|oid| oid.starts_with(prefix))
            .collect())
    }

    fn object_path(&self, object_type: ObjectType, object_id: &ObjectId) -> PathBuf {
        self.path
            .join(object_type.dir_name())
            .join(object_id.as_ref())
    }

    fn parse_object_as_bytes(
        &self,
        object_type: ObjectType,
        object_id: &ObjectId,
    ) -> anyhow::Result<impl BufRead> {
        let object_content = self.load_raw(object_type, object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let stored_type = ObjectType::parse_object_type(&mut object_reader)?;
        if stored_type != object_type {
            anyhow::bail!("object {object_id} is a {stored_type}, expected a {object_type}");
        }

        Ok(object_reader)
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).context(format!(
            "Unable to create object directory {}",
            object_dir.display()
        ))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
