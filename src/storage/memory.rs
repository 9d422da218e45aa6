/// In-memory object storage backend
///
/// Process-local container used for development and tests. Listing order is
/// lexicographic by name. Public URLs point back at the gallery's own
/// `/blob/{name}` route so uploads are viewable without cloud credentials.
use crate::{
    error::GalleryResult,
    storage::{ObjectEntry, ObjectKind, ObjectStore},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
    kind: ObjectKind,
}

/// Memory storage backend
#[derive(Clone)]
pub struct MemoryObjectStore {
    container: String,
    public_base: String,
    objects: Arc<RwLock<BTreeMap<String, StoredObject>>>,
}

impl MemoryObjectStore {
    /// Create a new memory backend
    ///
    /// `public_base` is the externally reachable base URL of this server,
    /// e.g. `http://localhost:8190`.
    pub fn new(container: &str, public_base: &str) -> Self {
        Self {
            container: container.to_string(),
            public_base: public_base.trim_end_matches('/').to_string(),
            objects: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Insert an object with an explicit kind tag
    ///
    /// The gallery itself only writes `Block` objects; other kinds model
    /// what a shared container might already contain.
    pub async fn put_with_kind(
        &self,
        name: &str,
        data: Vec<u8>,
        content_type: &str,
        kind: ObjectKind,
    ) {
        let mut objects = self.objects.write().await;
        objects.insert(
            name.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                kind,
            },
        );
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn ensure_container(&self) -> GalleryResult<()> {
        debug!("Container {} ready (memory)", self.container);
        Ok(())
    }

    async fn set_public_read(&self) -> GalleryResult<()> {
        // Memory objects are served by this process; nothing to grant.
        Ok(())
    }

    async fn list(&self) -> GalleryResult<Vec<ObjectEntry>> {
        let objects = self.objects.read().await;
        Ok(objects
            .iter()
            .map(|(name, stored)| ObjectEntry {
                name: name.clone(),
                kind: stored.kind,
            })
            .collect())
    }

    async fn put(&self, name: &str, data: Vec<u8>, content_type: &str) -> GalleryResult<()> {
        debug!("Storing object {} ({} bytes)", name, data.len());
        self.put_with_kind(name, data, content_type, ObjectKind::Block)
            .await;
        Ok(())
    }

    async fn get(&self, name: &str) -> GalleryResult<Option<(Vec<u8>, String)>> {
        let objects = self.objects.read().await;
        Ok(objects
            .get(name)
            .map(|stored| (stored.data.clone(), stored.content_type.clone())))
    }

    async fn delete(&self, name: &str) -> GalleryResult<()> {
        let mut objects = self.objects.write().await;
        objects.remove(name);
        Ok(())
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/blob/{}", self.public_base, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryObjectStore {
        MemoryObjectStore::new("test-container", "http://localhost:8190")
    }

    #[tokio::test]
    async fn test_put_and_get_object() {
        let backend = store();
        let data = b"test object data".to_vec();

        backend.put("a.png", data.clone(), "image/png").await.unwrap();

        let retrieved = backend.get("a.png").await.unwrap();
        assert_eq!(retrieved, Some((data, "image/png".to_string())));
    }

    #[tokio::test]
    async fn test_get_nonexistent_object() {
        let backend = store();

        let result = backend.get("nonexistent").await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let backend = store();

        backend.put("a.png", b"x".to_vec(), "image/png").await.unwrap();
        backend.delete("a.png").await.unwrap();
        assert_eq!(backend.get("a.png").await.unwrap(), None);

        // Absent object deletes without error
        backend.delete("a.png").await.unwrap();
        backend.delete("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_is_lexicographic() {
        let backend = store();

        backend.put("b.jpg", b"b".to_vec(), "image/jpeg").await.unwrap();
        backend.put("a.png", b"a".to_vec(), "image/png").await.unwrap();
        backend.put("c.gif", b"c".to_vec(), "image/gif").await.unwrap();

        let names: Vec<String> = backend
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec!["a.png", "b.jpg", "c.gif"]);
    }

    #[tokio::test]
    async fn test_object_url_points_at_blob_route() {
        let backend = store();
        assert_eq!(
            backend.object_url("123_abc.png"),
            "http://localhost:8190/blob/123_abc.png"
        );
    }
}
