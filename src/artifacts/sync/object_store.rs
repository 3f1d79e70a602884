use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;

/// Object access needed to replicate history between repositories
///
/// The local [`Database`] implements it; any other transport that can read
/// and write objects by hash can stand in for a remote.
pub trait ObjectStore {
    fn contains(&self, object_type: ObjectType, object_id: &ObjectId) -> bool;

    fn read_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit>;

    /// Serialized bytes of an object, as accepted by [`ObjectStore::write_raw`]
    fn read_raw(&self, object_type: ObjectType, object_id: &ObjectId) -> anyhow::Result<Bytes>;

    /// Store serialized bytes under `object_id`; a no-op returning `false`
    /// when the object is already present
    fn write_raw(
        &self,
        object_type: ObjectType,
        object_id: &ObjectId,
        content: Bytes,
    ) -> anyhow::Result<bool>;
}

impl ObjectStore for Database {
    fn contains(&self, object_type: ObjectType, object_id: &ObjectId) -> bool {
        self.exists(object_type, object_id)
    }

    fn read_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        self.load_commit(object_id)
    }

    fn read_raw(&self, object_type: ObjectType, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.load_raw(object_type, object_id)
    }

    fn write_raw(
        &self,
        object_type: ObjectType,
        object_id: &ObjectId,
        content: Bytes,
    ) -> anyhow::Result<bool> {
        self.store_raw(object_type, object_id, content)
    }
}
