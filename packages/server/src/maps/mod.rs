//! The content-addressed upload pipeline and its read paths.
//!
//! Writes go blob first, metadata second, with no transaction spanning the
//! two stores. A metadata failure after a successful blob write leaves an
//! orphaned blob behind; since keys are content-derived, retrying the same
//! upload overwrites it with identical bytes.

pub mod caption;
pub mod link;
pub mod read;
pub mod recorder;
pub mod upload;

use std::future::Future;
use std::time::Duration;

use common::storage::StorageError;
use sea_orm::DbErr;
use serde::Deserialize;

pub use caption::{
    CreatedCaption, Captioner, GeneratedCaption, ResolvedCaption, StubCaptioner, create_caption,
    resolve_caption,
};
pub use link::LinkResolver;
pub use read::{MapView, resolve_map};
pub use recorder::{MapRecord, MetadataRecorder};
pub use upload::{UploadOrchestrator, UploadOutcome, UploadRequest};

/// Enumerated metadata attached to every map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
pub struct MapFields {
    #[schema(example = "OSM")]
    pub source: String,
    #[schema(example = "AFR")]
    pub region: String,
    #[schema(example = "FLOOD")]
    pub category: String,
}

/// Failure of a pipeline stage, by kind.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// Bad or missing field, unknown code. Raised before any side effect.
    #[error("{0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The blob store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A metadata read or write failed.
    #[error("database error: {0}")]
    Persistence(#[from] DbErr),
}

/// Run `fut`, failing with `on_timeout()` if it outlives `deadline`.
///
/// Dropping the inner future aborts its in-flight I/O.
pub(crate) async fn within<T, E>(
    deadline: Duration,
    fut: impl Future<Output = Result<T, E>>,
    on_timeout: impl FnOnce() -> E,
) -> Result<T, E> {
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout()),
    }
}
