/// Gallery operations over the storage container
use crate::{
    error::{GalleryError, GalleryResult},
    gallery::naming,
    storage::{ObjectKind, ObjectStore},
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// The gallery's operations surface
///
/// Holds the one configured storage handle for the process and provisions
/// the container lazily, exactly once. The gallery view is always
/// recomputed from a live listing; nothing is cached.
pub struct GalleryStore {
    backend: Arc<dyn ObjectStore>,
    provisioned: OnceCell<()>,
}

impl GalleryStore {
    /// Create a new gallery store over a storage backend
    pub fn new(backend: Arc<dyn ObjectStore>) -> Self {
        Self {
            backend,
            provisioned: OnceCell::new(),
        }
    }

    /// Ensure the container exists and allows public blob reads
    ///
    /// The backend provisioning runs once per process; concurrent callers
    /// await the in-flight initialization. A failed attempt leaves the cell
    /// empty, so the next caller retries.
    pub async fn ensure_ready(&self) -> GalleryResult<()> {
        self.provisioned
            .get_or_try_init(|| async {
                self.backend.ensure_container().await?;
                self.backend.set_public_read().await?;
                info!("✓ Gallery container provisioned");
                Ok::<(), GalleryError>(())
            })
            .await?;
        Ok(())
    }

    /// Public URLs of all gallery images, in backend enumeration order
    ///
    /// Only block-style objects count; other variants a shared container
    /// might hold are excluded.
    pub async fn list_image_urls(&self) -> GalleryResult<Vec<String>> {
        self.ensure_ready().await?;

        let entries = self.backend.list().await?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.kind == ObjectKind::Block)
            .map(|entry| self.backend.object_url(&entry.name))
            .collect())
    }

    /// Store uploaded content under a freshly generated blob name
    ///
    /// Returns the generated name. A name collision is not specially
    /// handled; the last writer wins.
    pub async fn store_blob(&self, file_name: &str, data: Vec<u8>) -> GalleryResult<String> {
        self.ensure_ready().await?;

        let blob_name = naming::generate_blob_name(file_name);
        let content_type = naming::content_type_for(&blob_name);

        debug!(
            "Storing {} as {} ({} bytes)",
            file_name,
            blob_name,
            data.len()
        );
        self.backend.put(&blob_name, data, content_type).await?;

        Ok(blob_name)
    }

    /// Retrieve a blob's content and content type by name
    pub async fn get_blob(&self, name: &str) -> GalleryResult<Option<(Vec<u8>, String)>> {
        self.ensure_ready().await?;
        self.backend.get(name).await
    }

    /// Delete one blob, addressed by its public URL or bare name
    ///
    /// Deleting a blob that does not exist is a success.
    pub async fn delete_blob(&self, url_or_name: &str) -> GalleryResult<()> {
        self.ensure_ready().await?;

        let blob_name = blob_name_from(url_or_name);
        debug!("Deleting blob {}", blob_name);
        self.backend.delete(blob_name).await
    }

    /// Delete every gallery image in the container
    ///
    /// Deletions run sequentially and stop at the first failure; the
    /// container may be left partially emptied.
    pub async fn delete_all(&self) -> GalleryResult<()> {
        self.ensure_ready().await?;

        let entries = self.backend.list().await?;
        for entry in entries {
            if entry.kind == ObjectKind::Block {
                self.backend.delete(&entry.name).await?;
            }
        }
        Ok(())
    }
}

/// Blob name from a public URL: the last path segment, with any query or
/// fragment stripped. A bare name passes through unchanged.
fn blob_name_from(url_or_name: &str) -> &str {
    let path = url_or_name
        .split(['?', '#'])
        .next()
        .unwrap_or(url_or_name);
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryObjectStore;
    use crate::storage::ObjectEntry;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn gallery() -> (Arc<MemoryObjectStore>, GalleryStore) {
        let backend = Arc::new(MemoryObjectStore::new(
            "test-gallery",
            "http://localhost:8190",
        ));
        let store = GalleryStore::new(backend.clone());
        (backend, store)
    }

    /// Test backend wrapping the memory store with provisioning counters and
    /// fault injection.
    struct HarnessStore {
        inner: MemoryObjectStore,
        provisions: AtomicUsize,
        fail_list: AtomicBool,
        fail_delete_prefix: Option<&'static str>,
    }

    impl HarnessStore {
        fn new() -> Self {
            Self {
                inner: MemoryObjectStore::new("test-gallery", "http://localhost:8190"),
                provisions: AtomicUsize::new(0),
                fail_list: AtomicBool::new(false),
                fail_delete_prefix: None,
            }
        }
    }

    #[async_trait]
    impl ObjectStore for HarnessStore {
        async fn ensure_container(&self) -> GalleryResult<()> {
            self.provisions.fetch_add(1, Ordering::SeqCst);
            self.inner.ensure_container().await
        }

        async fn set_public_read(&self) -> GalleryResult<()> {
            self.inner.set_public_read().await
        }

        async fn list(&self) -> GalleryResult<Vec<ObjectEntry>> {
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(GalleryError::Storage("List failed: injected".to_string()));
            }
            self.inner.list().await
        }

        async fn put(&self, name: &str, data: Vec<u8>, content_type: &str) -> GalleryResult<()> {
            self.inner.put(name, data, content_type).await
        }

        async fn get(&self, name: &str) -> GalleryResult<Option<(Vec<u8>, String)>> {
            self.inner.get(name).await
        }

        async fn delete(&self, name: &str) -> GalleryResult<()> {
            if let Some(prefix) = self.fail_delete_prefix {
                if name.starts_with(prefix) {
                    return Err(GalleryError::Storage(format!(
                        "Delete failed: injected for {}",
                        name
                    )));
                }
            }
            self.inner.delete(name).await
        }

        fn object_url(&self, name: &str) -> String {
            self.inner.object_url(name)
        }
    }

    #[tokio::test]
    async fn test_upload_batch_lists_both_urls() {
        let (_, store) = gallery();

        let png = vec![1u8; 500];
        let jpg = vec![2u8; 1200];
        store.store_blob("a.png", png).await.unwrap();
        store.store_blob("b.jpg", jpg).await.unwrap();

        let urls = store.list_image_urls().await.unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls.iter().any(|url| url.ends_with(".png")));
        assert!(urls.iter().any(|url| url.ends_with(".jpg")));
    }

    #[tokio::test]
    async fn test_store_blob_round_trips() {
        let (backend, store) = gallery();

        let data = vec![7u8; 500];
        let name = store.store_blob("a.png", data.clone()).await.unwrap();

        let (stored, content_type) = backend.get(&name).await.unwrap().unwrap();
        assert_eq!(stored, data);
        assert_eq!(content_type, "image/png");

        let urls = store.list_image_urls().await.unwrap();
        assert!(urls.contains(&backend.object_url(&name)));
    }

    #[tokio::test]
    async fn test_delete_by_url_leaves_the_rest() {
        let (backend, store) = gallery();

        let a = store.store_blob("a.png", vec![1u8; 500]).await.unwrap();
        let b = store.store_blob("b.jpg", vec![2u8; 1200]).await.unwrap();

        store.delete_blob(&backend.object_url(&a)).await.unwrap();

        let urls = store.list_image_urls().await.unwrap();
        assert_eq!(urls, vec![backend.object_url(&b)]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (backend, store) = gallery();

        // Absent blob deletes without error
        store.delete_blob("never-existed.png").await.unwrap();

        let name = store.store_blob("a.png", vec![1u8; 10]).await.unwrap();
        let url = backend.object_url(&name);
        store.delete_blob(&url).await.unwrap();
        store.delete_blob(&url).await.unwrap();

        assert!(store.list_image_urls().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_all_on_empty_container() {
        let (_, store) = gallery();
        store.delete_all().await.unwrap();
        assert!(store.list_image_urls().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_all_empties_the_container() {
        let (_, store) = gallery();

        store.store_blob("a.png", vec![1u8; 10]).await.unwrap();
        store.store_blob("b.jpg", vec![2u8; 10]).await.unwrap();
        store.store_blob("c.gif", vec![3u8; 10]).await.unwrap();

        store.delete_all().await.unwrap();
        assert!(store.list_image_urls().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_block_objects_are_invisible_and_kept() {
        let (backend, store) = gallery();

        backend
            .put_with_kind("journal.log", b"x".to_vec(), "text/plain", ObjectKind::Other)
            .await;
        store.store_blob("a.png", vec![1u8; 10]).await.unwrap();

        // Listing excludes the foreign object
        let urls = store.list_image_urls().await.unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].ends_with(".png"));

        // Delete-all leaves it untouched
        store.delete_all().await.unwrap();
        assert!(backend.get("journal.log").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_ensure_ready_provisions_once() {
        let backend = Arc::new(HarnessStore::new());
        let store = GalleryStore::new(backend.clone());

        store.ensure_ready().await.unwrap();
        store.ensure_ready().await.unwrap();
        store.list_image_urls().await.unwrap();
        store.store_blob("a.png", vec![1u8; 10]).await.unwrap();

        assert_eq!(backend.provisions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_list_failure_propagates_with_message() {
        let backend = Arc::new(HarnessStore::new());
        let store = GalleryStore::new(backend.clone());

        backend.fail_list.store(true, Ordering::SeqCst);

        let err = store.list_image_urls().await.unwrap_err();
        assert!(!err.to_string().is_empty());
        assert!(err.to_string().contains("List failed"));
    }

    #[tokio::test]
    async fn test_delete_all_aborts_on_first_failure() {
        let backend = Arc::new(HarnessStore {
            fail_delete_prefix: Some("00-poison"),
            ..HarnessStore::new()
        });
        let store = GalleryStore::new(backend.clone());

        backend
            .inner
            .put("00-poison.png", b"a".to_vec(), "image/png")
            .await
            .unwrap();
        backend
            .inner
            .put("zz-survivor.jpg", b"b".to_vec(), "image/jpeg")
            .await
            .unwrap();

        // Enumeration is lexicographic, so the poisoned blob comes first and
        // the survivor is never reached.
        assert!(store.delete_all().await.is_err());
        assert!(backend.inner.get("zz-survivor.jpg").await.unwrap().is_some());
    }

    #[test]
    fn test_blob_name_from_url_forms() {
        assert_eq!(
            blob_name_from("https://gallery.s3.us-east-1.amazonaws.com/123_abc.png"),
            "123_abc.png"
        );
        assert_eq!(
            blob_name_from("http://localhost:9000/gallery/123_abc.png?versionId=7"),
            "123_abc.png"
        );
        assert_eq!(blob_name_from("123_abc.png"), "123_abc.png");
        assert_eq!(blob_name_from("http://h/p/a.png#frag"), "a.png");
    }
}
