/// Application context and dependency injection
use crate::{
    config::{BackendConfig, GalleryConfig},
    error::GalleryResult,
    gallery::GalleryStore,
    storage::{
        memory::MemoryObjectStore,
        s3::{S3Config, S3ObjectStore},
        ObjectStore,
    },
};
use std::sync::Arc;
use tracing::info;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<GalleryConfig>,
    pub gallery: Arc<GalleryStore>,
}

impl AppContext {
    /// Create a new application context from configuration
    ///
    /// The storage handle is constructed here, once, and shared by every
    /// request; nothing is re-initialized per request.
    pub async fn new(config: GalleryConfig) -> GalleryResult<Self> {
        config.validate()?;

        let backend: Arc<dyn ObjectStore> = match &config.storage.backend {
            BackendConfig::S3 {
                region,
                access_key_id,
                secret_access_key,
                endpoint,
            } => Arc::new(
                S3ObjectStore::new(S3Config {
                    container: config.storage.container.clone(),
                    region: region.clone(),
                    access_key_id: access_key_id.clone(),
                    secret_access_key: secret_access_key.clone(),
                    endpoint: endpoint.clone(),
                })
                .await?,
            ),
            BackendConfig::Memory => {
                info!("Using in-memory object storage (development mode)");
                Arc::new(MemoryObjectStore::new(
                    &config.storage.container,
                    &service_base(&config),
                ))
            }
        };

        let gallery = Arc::new(GalleryStore::new(backend));

        Ok(Self {
            config: Arc::new(config),
            gallery,
        })
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        service_base(&self.config)
    }
}

fn service_base(config: &GalleryConfig) -> String {
    format!("http://{}:{}", config.service.hostname, config.service.port)
}
