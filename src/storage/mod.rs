/// Object storage abstraction
///
/// The gallery addresses exactly one container through the `ObjectStore`
/// trait. Backends: S3-compatible cloud storage and a process-local
/// in-memory store for development and tests.

pub mod memory;
pub mod s3;

use crate::error::GalleryResult;
use async_trait::async_trait;

/// Kind tag for listed objects
///
/// A shared container may hold object variants this gallery never creates.
/// Everything the gallery writes is `Block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Simple block-style object
    Block,
    /// Any other storage object variant
    Other,
}

/// One entry from a container listing
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    pub name: String,
    pub kind: ObjectKind,
}

/// Object storage backend trait
///
/// Implementations handle container provisioning and the actual storage and
/// retrieval of object data.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create the container if it does not exist. Idempotent.
    async fn ensure_container(&self) -> GalleryResult<()>;

    /// Allow anonymous reads of individual objects, not container listing.
    async fn set_public_read(&self) -> GalleryResult<()>;

    /// List all objects in the container, in backend enumeration order.
    async fn list(&self) -> GalleryResult<Vec<ObjectEntry>>;

    /// Upload an object, overwriting any existing object with the same name.
    async fn put(&self, name: &str, data: Vec<u8>, content_type: &str) -> GalleryResult<()>;

    /// Retrieve an object's content and content type, or None if absent.
    async fn get(&self, name: &str) -> GalleryResult<Option<(Vec<u8>, String)>>;

    /// Delete an object. Deleting an absent object succeeds.
    async fn delete(&self, name: &str) -> GalleryResult<()>;

    /// Public URL for an object name.
    fn object_url(&self, name: &str) -> String;
}
