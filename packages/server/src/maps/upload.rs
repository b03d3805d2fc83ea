use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::storage::{BlobStore, ContentHash, StorageError, StorageKey, extension_for};
use sea_orm::DbErr;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::recorder::MetadataRecorder;
use super::{MapError, MapFields, within};
use crate::lookup::LookupSets;

/// A fully received upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub fields: MapFields,
    pub countries: Vec<String>,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Result of a successful upload. Only `map_id` leaves the service boundary.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub map_id: Uuid,
    pub key: StorageKey,
    pub digest: ContentHash,
}

/// Validates, hashes, stores and records one upload.
pub struct UploadOrchestrator {
    store: Arc<dyn BlobStore>,
    recorder: MetadataRecorder,
    lookups: Arc<LookupSets>,
    io_timeout: Duration,
}

impl UploadOrchestrator {
    pub fn new(
        store: Arc<dyn BlobStore>,
        recorder: MetadataRecorder,
        lookups: Arc<LookupSets>,
        io_timeout: Duration,
    ) -> Self {
        Self {
            store,
            recorder,
            lookups,
            io_timeout,
        }
    }

    pub async fn upload(&self, request: UploadRequest) -> Result<UploadOutcome, MapError> {
        self.upload_at(request, Utc::now()).await
    }

    /// Run the pipeline with an explicit upload time (drives the key's date
    /// partition).
    #[instrument(
        skip_all,
        fields(source = %request.fields.source, region = %request.fields.region, size = request.data.len())
    )]
    pub async fn upload_at(
        &self,
        request: UploadRequest,
        uploaded_at: DateTime<Utc>,
    ) -> Result<UploadOutcome, MapError> {
        // Validation runs before the store is touched: a rejected request
        // leaves nothing behind.
        self.lookups.validate_fields(&request.fields)?;
        let countries = self.lookups.validate_countries(&request.countries)?;
        if request.data.is_empty() {
            return Err(MapError::Validation("file is empty".into()));
        }

        let digest = ContentHash::compute(&request.data);
        let key = StorageKey::derive(&digest, uploaded_at, extension_for(&request.content_type));

        let deadline = self.io_timeout;
        within(
            deadline,
            self.store
                .persist_bytes(key.as_str(), request.data, &request.content_type),
            || StorageError::TimedOut(deadline),
        )
        .await?;

        let map_id = Uuid::now_v7();
        let recorded = within(
            deadline,
            self.recorder
                .insert_map(map_id, key.as_str(), &digest, &request.fields),
            || DbErr::Custom(format!("metadata write timed out after {deadline:?}")),
        )
        .await;
        if let Err(e) = recorded {
            warn!(
                %key,
                %digest,
                error = %e,
                "Metadata write failed after blob was stored; blob is orphaned until re-uploaded"
            );
            return Err(e.into());
        }

        within(
            deadline,
            self.recorder.add_countries(map_id, &countries),
            || DbErr::Custom(format!("country write timed out after {deadline:?}")),
        )
        .await?;

        info!(%map_id, %key, %digest, "Map uploaded");
        Ok(UploadOutcome {
            map_id,
            key,
            digest,
        })
    }
}
