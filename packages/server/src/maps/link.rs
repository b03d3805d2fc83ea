use std::sync::Arc;
use std::time::Duration;

use common::storage::{BlobStore, StorageError};

/// Turns storage keys into URLs callers can fetch, valid for a fixed TTL.
#[derive(Clone)]
pub struct LinkResolver {
    store: Arc<dyn BlobStore>,
    ttl: Duration,
}

impl LinkResolver {
    pub fn new(store: Arc<dyn BlobStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub async fn resolve(&self, key: &str) -> Result<String, StorageError> {
        self.store.link(key, self.ttl).await
    }
}
