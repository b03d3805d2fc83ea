use std::sync::Arc;
use std::time::Duration;

use common::storage::BlobStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::lookup::LookupSets;
use crate::maps::{Captioner, LinkResolver, MetadataRecorder, UploadOrchestrator};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub uploads: Arc<UploadOrchestrator>,
    pub recorder: MetadataRecorder,
    pub links: LinkResolver,
    pub lookups: Arc<LookupSets>,
    pub captioner: Arc<dyn Captioner>,
}

impl AppState {
    /// Wire the pipeline components around one blob store and one database.
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        blob_store: Arc<dyn BlobStore>,
        captioner: Arc<dyn Captioner>,
    ) -> Self {
        let lookups = Arc::new(LookupSets::from_config(&config.lookups));
        let recorder = MetadataRecorder::new(db);
        let uploads = Arc::new(UploadOrchestrator::new(
            blob_store.clone(),
            recorder.clone(),
            lookups.clone(),
            Duration::from_secs(config.storage.io_timeout_secs),
        ));
        let links = LinkResolver::new(
            blob_store,
            Duration::from_secs(config.storage.link_ttl_secs),
        );

        Self {
            config,
            uploads,
            recorder,
            links,
            lookups,
            captioner,
        }
    }
}
