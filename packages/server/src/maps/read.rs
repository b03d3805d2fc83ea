use tracing::instrument;
use uuid::Uuid;

use super::link::LinkResolver;
use super::recorder::{MapRecord, MetadataRecorder};
use super::MapError;

/// A map as returned on the read path.
#[derive(Debug, Clone)]
pub struct MapView {
    pub record: MapRecord,
    pub countries: Vec<String>,
    pub image_url: String,
}

#[instrument(skip(recorder, links))]
pub async fn resolve_map(
    recorder: &MetadataRecorder,
    links: &LinkResolver,
    id: Uuid,
) -> Result<MapView, MapError> {
    let record = recorder
        .find_map(id)
        .await?
        .ok_or_else(|| MapError::NotFound(format!("map {id} not found")))?;
    let countries = recorder.countries_of(id).await?;
    let image_url = links.resolve(&record.file_key).await?;
    Ok(MapView {
        record,
        countries,
        image_url,
    })
}
