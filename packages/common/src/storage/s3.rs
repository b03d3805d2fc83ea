use std::time::Duration;

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};

use super::error::StorageError;
use super::traits::{BlobStore, BoxReader};
use crate::config::S3StorageConfig;

/// Longest validity SigV4 allows for a presigned URL.
const MAX_PRESIGN_SECS: u64 = 7 * 24 * 60 * 60;

/// Blob store backed by an S3-compatible object service (AWS, MinIO, ...).
pub struct S3BlobStore {
    bucket: Box<Bucket>,
}

impl S3BlobStore {
    pub fn new(config: &S3StorageConfig) -> Result<Self, StorageError> {
        let endpoint = if config.endpoint.contains("://") {
            config.endpoint.clone()
        } else {
            let scheme = if config.use_ssl { "https" } else { "http" };
            format!("{scheme}://{}", config.endpoint)
        };
        let region = Region::Custom {
            region: config.region.clone(),
            endpoint,
        };

        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::backend("invalid object storage credentials", e))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::backend("invalid object storage bucket", e))?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self { bucket })
    }

    /// Sign a GET URL for `key` without checking that the object exists.
    pub async fn presign(&self, key: &str, ttl: Duration) -> Result<String, StorageError> {
        let expiry_secs = presign_expiry(ttl)?;
        self.bucket
            .presign_get(key, expiry_secs, None)
            .await
            .map_err(|e| StorageError::backend(format!("presign {key}"), e))
    }
}

/// Validate a link ttl. Zero is rejected rather than replaced by a default.
fn presign_expiry(ttl: Duration) -> Result<u32, StorageError> {
    let secs = ttl.as_secs();
    if secs == 0 || secs > MAX_PRESIGN_SECS {
        return Err(StorageError::InvalidTtl(ttl));
    }
    u32::try_from(secs).map_err(|_| StorageError::InvalidTtl(ttl))
}

fn ensure_success(operation: impl Into<String>, status: u16) -> Result<(), StorageError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(StorageError::Remote {
            operation: operation.into(),
            status,
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn persist(
        &self,
        key: &str,
        mut reader: BoxReader,
        size_hint: Option<u64>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .bucket
            .put_object_stream_with_content_type(&mut reader, key, content_type)
            .await
            .map_err(|e| StorageError::backend(format!("PUT {key}"), e))?;
        ensure_success(format!("PUT {key}"), response.status_code())?;

        tracing::debug!(
            key,
            size_hint,
            bucket = %self.bucket.name(),
            "Persisted blob to object storage"
        );
        Ok(())
    }

    async fn link(&self, key: &str, ttl: Duration) -> Result<String, StorageError> {
        presign_expiry(ttl)?;

        let (_, status) = self
            .bucket
            .head_object(key)
            .await
            .map_err(|e| StorageError::backend(format!("HEAD {key}"), e))?;
        if status == 404 {
            return Err(StorageError::NotFound(key.to_string()));
        }
        ensure_success(format!("HEAD {key}"), status)?;

        self.presign(key, ttl).await
    }
}
