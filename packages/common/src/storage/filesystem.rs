use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::error::StorageError;
use super::traits::{BlobStore, BoxReader};

const TEMP_DIR: &str = ".tmp";

/// Filesystem-backed blob store rooted at a directory.
///
/// A key maps to `{root}/{key}`. Writes land in `{root}/.tmp` first and are
/// renamed into place, so a reader never observes a partially written object.
pub struct FilesystemBlobStore {
    root: PathBuf,
    public_prefix: String,
    max_size: u64,
}

impl FilesystemBlobStore {
    /// Create a new filesystem blob store.
    ///
    /// `public_prefix` is the URL path under which a static file route serves
    /// `root`; `link` returns `{public_prefix}/{key}`.
    pub async fn new(
        root: PathBuf,
        public_prefix: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(TEMP_DIR)).await?;
        Ok(Self {
            root,
            public_prefix: public_prefix.into(),
            max_size,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to its final path, rejecting anything that could escape
    /// the root or collide with the temp area.
    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.split('/').any(|seg| seg.is_empty() || seg.starts_with('.')) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        if !Path::new(key)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root
            .join(TEMP_DIR)
            .join(uuid::Uuid::new_v4().to_string())
    }

    async fn write_temp(&self, reader: &mut BoxReader, temp_path: &Path) -> Result<u64, StorageError> {
        let mut temp_file = fs::File::create(temp_path).await?;
        let mut total_bytes: u64 = 0;
        let mut buf = vec![0u8; 64 * 1024];

        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }

            total_bytes += n as u64;
            if total_bytes > self.max_size {
                return Err(StorageError::SizeLimitExceeded {
                    actual: total_bytes,
                    limit: self.max_size,
                });
            }

            temp_file.write_all(&buf[..n]).await?;
        }

        temp_file.flush().await?;
        temp_file.sync_all().await?;
        Ok(total_bytes)
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn persist(
        &self,
        key: &str,
        mut reader: BoxReader,
        size_hint: Option<u64>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let object_path = self.object_path(key)?;

        if let Some(hint) = size_hint
            && hint > self.max_size
        {
            return Err(StorageError::SizeLimitExceeded {
                actual: hint,
                limit: self.max_size,
            });
        }

        let temp_path = self.temp_path();
        let written = match self.write_temp(&mut reader, &temp_path).await {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&temp_path).await;
                return Err(e);
            }
        };

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // rename(2) replaces an existing file atomically.
        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(key, bytes = written, "Persisted blob to filesystem");
        Ok(())
    }

    async fn link(&self, key: &str, _ttl: Duration) -> Result<String, StorageError> {
        self.object_path(key)?;
        Ok(format!("{}/{key}", self.public_prefix.trim_end_matches('/')))
    }
}
