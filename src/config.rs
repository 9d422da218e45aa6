/// Configuration management for the gallery server
use crate::error::{GalleryError, GalleryResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub upload_limit: usize,
}

/// Storage configuration
///
/// Every operation for the process lifetime targets the one configured
/// container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub container: String,
    pub backend: BackendConfig,
}

/// Storage backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BackendConfig {
    /// S3-compatible cloud object storage
    S3 {
        region: String,
        access_key_id: String,
        secret_access_key: String,
        endpoint: Option<String>,
    },
    /// Process-local storage for development and tests
    Memory,
}

impl GalleryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> GalleryResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("GALLERY_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("GALLERY_PORT")
            .unwrap_or_else(|_| "8190".to_string())
            .parse()
            .map_err(|_| GalleryError::Config("Invalid port number".to_string()))?;
        let upload_limit = env::var("GALLERY_UPLOAD_LIMIT")
            .unwrap_or_else(|_| "10485760".to_string())
            .parse()
            .unwrap_or(10485760);

        let container =
            env::var("GALLERY_CONTAINER").unwrap_or_else(|_| "gallery-images".to_string());

        let backend = if let Ok(access_key_id) = env::var("GALLERY_S3_ACCESS_KEY_ID") {
            BackendConfig::S3 {
                region: env::var("GALLERY_S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id,
                secret_access_key: env::var("GALLERY_S3_SECRET_ACCESS_KEY")
                    .map_err(|_| GalleryError::Config("S3 secret key required".to_string()))?,
                endpoint: env::var("GALLERY_S3_ENDPOINT").ok(),
            }
        } else {
            BackendConfig::Memory
        };

        let config = GalleryConfig {
            service: ServiceConfig {
                hostname,
                port,
                upload_limit,
            },
            storage: StorageConfig { container, backend },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> GalleryResult<()> {
        if self.service.hostname.is_empty() {
            return Err(GalleryError::Config("Hostname cannot be empty".to_string()));
        }

        if self.storage.container.is_empty() {
            return Err(GalleryError::Config(
                "Container name cannot be empty".to_string(),
            ));
        }

        // Container names double as bucket names on the S3 backend.
        if !self
            .storage
            .container
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(GalleryError::Config(
                "Container name must be lowercase alphanumeric or '-'".to_string(),
            ));
        }

        Ok(())
    }
}
