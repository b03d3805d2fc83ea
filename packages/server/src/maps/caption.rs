use async_trait::async_trait;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::MapError;
use super::link::LinkResolver;
use super::recorder::MetadataRecorder;

/// Output of a caption generator.
#[derive(Debug, Clone)]
pub struct GeneratedCaption {
    pub text: String,
    pub model: String,
    /// Whatever the generator returned, kept verbatim for auditing.
    pub raw: serde_json::Value,
}

/// Produces a caption for the blob stored under `key`.
#[async_trait]
pub trait Captioner: Send + Sync {
    async fn generate(&self, key: &str) -> GeneratedCaption;
}

/// Fixed placeholder caption.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubCaptioner;

impl StubCaptioner {
    pub const TEXT: &'static str = "Stub caption: replace me";
    pub const MODEL: &'static str = "STUB";
}

#[async_trait]
impl Captioner for StubCaptioner {
    async fn generate(&self, key: &str) -> GeneratedCaption {
        GeneratedCaption {
            text: Self::TEXT.to_string(),
            model: Self::MODEL.to_string(),
            raw: serde_json::json!({ "stub": true, "key": key }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatedCaption {
    pub id: Uuid,
    pub generated: String,
}

#[derive(Debug, Clone)]
pub struct ResolvedCaption {
    pub image_url: String,
    pub generated: String,
}

/// Generate and store a caption for an existing map.
///
/// Fails with `NotFound` without writing anything when the map is absent.
#[instrument(skip(recorder, captioner))]
pub async fn create_caption(
    recorder: &MetadataRecorder,
    captioner: &dyn Captioner,
    map_id: Uuid,
) -> Result<CreatedCaption, MapError> {
    let map = recorder
        .find_map(map_id)
        .await?
        .ok_or_else(|| MapError::NotFound(format!("map {map_id} not found")))?;

    let caption = captioner.generate(&map.file_key).await;
    let id = recorder
        .insert_caption(map_id, &caption.text, &caption.model, caption.raw)
        .await?;
    debug!(caption_id = %id, model = %caption.model, "Caption stored");

    Ok(CreatedCaption {
        id,
        generated: caption.text,
    })
}

/// Load a caption and a fresh link to its map's image.
#[instrument(skip(recorder, links))]
pub async fn resolve_caption(
    recorder: &MetadataRecorder,
    links: &LinkResolver,
    id: Uuid,
) -> Result<ResolvedCaption, MapError> {
    let (row, key) = recorder
        .find_caption(id)
        .await?
        .ok_or_else(|| MapError::NotFound(format!("caption {id} not found")))?;
    let image_url = links.resolve(&key).await?;
    Ok(ResolvedCaption {
        image_url,
        generated: row.generated,
    })
}
