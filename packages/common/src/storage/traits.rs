use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Key-addressed blob storage with linkable objects.
///
/// Keys are derived from content digests by the caller; backends treat them as
/// opaque relative paths.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store the bytes produced by `reader` under `key`.
    ///
    /// Idempotent: persisting equal bytes under the same key again leaves the
    /// store in the same observable state.
    async fn persist(
        &self,
        key: &str,
        reader: BoxReader,
        size_hint: Option<u64>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Store an in-memory buffer under `key`, taking ownership of it.
    async fn persist_bytes(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let size = data.len() as u64;
        let reader: BoxReader = Box::new(Cursor::new(data));
        self.persist(key, reader, Some(size), content_type).await
    }

    /// Return a URL through which `key` can be read for roughly `ttl`.
    ///
    /// Backends differ on existence checks: the remote backend returns
    /// `NotFound` for an absent key, the local backend hands out a path
    /// without looking at the file.
    async fn link(&self, key: &str, ttl: Duration) -> Result<String, StorageError>;
}
