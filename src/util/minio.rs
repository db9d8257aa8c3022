use async_trait::async_trait;
use minio::s3::args::{BucketExistsArgs, MakeBucketArgs, PutObjectArgs, RemoveObjectArgs};
use minio::s3::client::{Client, ClientBuilder};
use minio::s3::creds::StaticProvider;
use minio::s3::http::BaseUrl;
use std::io::Cursor;
use tracing::{debug, error, info, instrument, warn};

use crate::config::MinioConfig;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Operation error: {0}")]
    OperationError(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Object storage for club documents.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store the bytes under `key` and return the public URL.
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String, StorageError>;
    async fn remove_object(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct MinioService {
    client: Client,
    pub config: MinioConfig,
}

impl MinioService {
    #[instrument(skip(config), fields(endpoint = %config.endpoint, bucket = %config.bucket))]
    pub async fn new(config: MinioConfig) -> Result<Self, StorageError> {
        config.validate().map_err(|e| {
            error!("MinIO configuration validation failed: {}", e);
            StorageError::ConfigError(e.to_string())
        })?;

        let base_url = config.endpoint_url().parse::<BaseUrl>().map_err(|e| {
            error!("Failed to parse MinIO endpoint URL: {}", e);
            StorageError::ConnectionError(format!("Invalid endpoint URL: {}", e))
        })?;

        let static_provider = StaticProvider::new(&config.access_key, &config.secret_key, None);

        let client = ClientBuilder::new(base_url)
            .provider(Some(Box::new(static_provider)))
            .build()
            .map_err(|e| {
                error!("Failed to create MinIO client: {}", e);
                StorageError::ConnectionError(format!("Client creation failed: {}", e))
            })?;

        let service = Self { client, config };
        service.ensure_bucket_exists().await?;

        info!("Document storage ready");
        Ok(service)
    }

    async fn ensure_bucket_exists(&self) -> Result<(), StorageError> {
        let bucket = &self.config.bucket;
        let exists_args =
            BucketExistsArgs::new(bucket).map_err(|e| StorageError::InvalidArguments(e.to_string()))?;

        let exists = self.client.bucket_exists(&exists_args).await.map_err(|e| {
            error!("Failed to check if bucket exists: {}", e);
            StorageError::OperationError(format!("Bucket exists check failed: {}", e))
        })?;

        if exists {
            debug!("Bucket '{}' already exists", bucket);
            return Ok(());
        }

        warn!("Bucket '{}' does not exist, creating it", bucket);
        let make_args = MakeBucketArgs::new(bucket).map_err(|e| StorageError::InvalidArguments(e.to_string()))?;
        self.client.make_bucket(&make_args).await.map_err(|e| {
            error!("Failed to create bucket '{}': {}", bucket, e);
            StorageError::OperationError(format!("Bucket creation failed: {}", e))
        })?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for MinioService {
    #[instrument(skip(self, data), fields(key = %key, size = data.len()))]
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        let bucket_name = self.config.bucket.clone();
        let object_name = key.to_string();
        let content_type = content_type.to_string();
        let client = self.client.clone();

        // PutObjectArgs borrows a reader that is not Send.
        tokio::task::spawn_blocking(move || {
            let mut reader = Cursor::new(data);
            let data_len = reader.get_ref().len();

            let mut args = PutObjectArgs::new(&bucket_name, &object_name, &mut reader, Some(data_len), None)
                .map_err(|e| StorageError::InvalidArguments(e.to_string()))?;
            args.content_type = &content_type;

            futures::executor::block_on(client.put_object(&mut args))
                .map_err(|e| StorageError::OperationError(format!("Upload failed: {}", e)))?;
            Ok::<(), StorageError>(())
        })
        .await
        .map_err(|e| {
            error!("Failed to join blocking upload task: {}", e);
            StorageError::OperationError(format!("Join error: {}", e))
        })??;

        info!("Stored object '{}'", key);
        Ok(self.config.public_url(key))
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn remove_object(&self, key: &str) -> Result<(), StorageError> {
        let args = RemoveObjectArgs::new(&self.config.bucket, key)
            .map_err(|e| StorageError::InvalidArguments(e.to_string()))?;

        self.client.remove_object(&args).await.map_err(|e| {
            error!("Failed to delete object '{}': {}", key, e);
            StorageError::OperationError(format!("Delete failed: {}", e))
        })?;

        info!("Deleted object '{}'", key);
        Ok(())
    }
}

/// Object key for an uploaded club document: `documents/<uuid>-<safe name>`.
pub fn document_object_key(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("documents/{}-{}", uuid::Uuid::new_v4(), safe)
}
