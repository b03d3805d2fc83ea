mod error;
mod hash;
mod key;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

use std::sync::Arc;

pub use error::StorageError;
pub use hash::ContentHash;
pub use key::{StorageKey, extension_for, resolve_content_type};
pub use traits::{BlobStore, BoxReader};

use crate::config::{StorageConfig, StorageDriver};

/// Build the configured blob store backend.
///
/// Called once at start-up; the result is shared as `Arc<dyn BlobStore>`.
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn BlobStore>, StorageError> {
    match config.driver {
        StorageDriver::Local => {
            let store = filesystem::FilesystemBlobStore::new(
                config.local.root.clone(),
                config.local.public_prefix.clone(),
                config.max_blob_size,
            )
            .await?;
            tracing::info!(root = %config.local.root.display(), "Using local blob store");
            Ok(Arc::new(store))
        }
        #[cfg(feature = "object-storage")]
        StorageDriver::S3 => {
            let s3 = config.s3.as_ref().ok_or_else(|| {
                StorageError::Config("storage.s3 section is required for the s3 driver".into())
            })?;
            let store = s3::S3BlobStore::new(s3)?;
            tracing::info!(endpoint = %s3.endpoint, bucket = %s3.bucket, "Using S3 blob store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "object-storage"))]
        StorageDriver::S3 => Err(StorageError::Config(
            "built without the object-storage feature".into(),
        )),
    }
}
