/// S3-compatible object storage backend
use crate::{
    error::{GalleryError, GalleryResult},
    storage::{ObjectEntry, ObjectKind, ObjectStore},
};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};

/// S3 object storage backend
///
/// Supports AWS S3 and S3-compatible storage providers (MinIO, DigitalOcean
/// Spaces, etc.) via an optional custom endpoint.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Arc<Client>,
    container: String,
    region: String,
    endpoint: Option<String>,
}

/// Configuration for S3 storage
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Container (bucket) name
    pub container: String,

    /// AWS region (e.g., "us-east-1")
    pub region: String,

    /// AWS access key ID
    pub access_key_id: String,

    /// AWS secret access key
    pub secret_access_key: String,

    /// Custom endpoint for S3-compatible services (e.g., MinIO)
    /// Example: "https://nyc3.digitaloceanspaces.com" or "http://localhost:9000"
    pub endpoint: Option<String>,
}

impl S3ObjectStore {
    /// Create a new S3 backend
    pub async fn new(config: S3Config) -> GalleryResult<Self> {
        info!(
            "Initializing S3 object storage (container: {}, region: {})",
            config.container, config.region
        );

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None, // session token
            None, // expiration
            "picstash",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut s3_config_builder = S3ConfigBuilder::from(&aws_config);

        if let Some(endpoint) = &config.endpoint {
            debug!("Using custom S3 endpoint: {}", endpoint);
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true); // Required for MinIO and some S3-compatible services
        }

        let client = Client::from_conf(s3_config_builder.build());

        info!("✓ S3 object storage initialized");

        Ok(Self {
            client: Arc::new(client),
            container: config.container,
            region: config.region,
            endpoint: config.endpoint,
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn ensure_container(&self) -> GalleryResult<()> {
        match self
            .client
            .head_bucket()
            .bucket(&self.container)
            .send()
            .await
        {
            Ok(_) => {
                debug!("Container {} already exists", self.container);
                Ok(())
            }
            Err(_) => {
                self.client
                    .create_bucket()
                    .bucket(&self.container)
                    .send()
                    .await
                    .map_err(|e| {
                        error!("Failed to create container {}: {}", self.container, e);
                        GalleryError::Provisioning(format!("Container create failed: {}", e))
                    })?;
                info!("Created container {}", self.container);
                Ok(())
            }
        }
    }

    async fn set_public_read(&self) -> GalleryResult<()> {
        // GetObject only; without a ListBucket grant anonymous enumeration
        // stays denied.
        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Sid": "PublicReadForBlobs",
                "Effect": "Allow",
                "Principal": "*",
                "Action": "s3:GetObject",
                "Resource": format!("arn:aws:s3:::{}/*", self.container),
            }]
        });

        self.client
            .put_bucket_policy()
            .bucket(&self.container)
            .policy(policy.to_string())
            .send()
            .await
            .map_err(|e| {
                error!("Failed to set container policy: {}", e);
                GalleryError::Provisioning(format!("Container policy failed: {}", e))
            })?;

        debug!("✓ Public read enabled on container {}", self.container);
        Ok(())
    }

    async fn list(&self) -> GalleryResult<Vec<ObjectEntry>> {
        let mut entries = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(&self.container);
            if let Some(token) = &continuation {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|e| {
                error!("Failed to list container {}: {}", self.container, e);
                GalleryError::Storage(format!("List failed: {}", e))
            })?;

            entries.extend(response.contents().iter().filter_map(|obj| {
                obj.key().map(|key| ObjectEntry {
                    name: key.to_string(),
                    // Everything stored through the S3 object API is block-style.
                    kind: ObjectKind::Block,
                })
            }));

            match response.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        Ok(entries)
    }

    async fn put(&self, name: &str, data: Vec<u8>, content_type: &str) -> GalleryResult<()> {
        debug!(
            "Uploading object {} ({} bytes, type: {})",
            name,
            data.len(),
            content_type
        );

        self.client
            .put_object()
            .bucket(&self.container)
            .key(name)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to upload object {}: {}", name, e);
                GalleryError::Storage(format!("Upload failed: {}", e))
            })?;

        debug!("✓ Object uploaded: {}", name);
        Ok(())
    }

    async fn get(&self, name: &str) -> GalleryResult<Option<(Vec<u8>, String)>> {
        match self
            .client
            .get_object()
            .bucket(&self.container)
            .key(name)
            .send()
            .await
        {
            Ok(response) => {
                let content_type = response
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = response
                    .body
                    .collect()
                    .await
                    .map_err(|e| {
                        error!("Failed to read object body: {}", e);
                        GalleryError::Storage(format!("Failed to read object: {}", e))
                    })?
                    .into_bytes()
                    .to_vec();

                Ok(Some((data, content_type)))
            }
            Err(e) => {
                let error_msg = format!("{:?}", e);
                if error_msg.contains("NoSuchKey") || error_msg.contains("NotFound") {
                    debug!("Object not found: {}", name);
                    Ok(None)
                } else {
                    error!("Failed to download object {}: {}", name, e);
                    Err(GalleryError::Storage(format!("Download failed: {}", e)))
                }
            }
        }
    }

    async fn delete(&self, name: &str) -> GalleryResult<()> {
        debug!("Deleting object {}", name);

        // S3 DeleteObject succeeds for absent keys.
        self.client
            .delete_object()
            .bucket(&self.container)
            .key(name)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to delete object {}: {}", name, e);
                GalleryError::Storage(format!("Delete failed: {}", e))
            })?;

        Ok(())
    }

    fn object_url(&self, name: &str) -> String {
        object_url_for(self.endpoint.as_deref(), &self.region, &self.container, name)
    }
}

/// Public URL for an object: path-style under a custom endpoint,
/// virtual-hosted style on AWS proper.
fn object_url_for(endpoint: Option<&str>, region: &str, container: &str, name: &str) -> String {
    match endpoint {
        Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), container, name),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", container, region, name),
    }
}
