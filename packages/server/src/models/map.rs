use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::maps::MapView;

/// Response DTO for a completed upload.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadMapResponse {
    /// Identifier of the new map record (UUIDv7).
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub map_id: Uuid,
}

/// Response DTO for a single map.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapResponse {
    pub map_id: Uuid,
    /// Storage key of the image.
    #[schema(example = "maps/2024/03/07/ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad.png")]
    pub file_key: String,
    /// SHA-256 of the image bytes, lowercase hex.
    #[schema(example = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")]
    pub sha256: String,
    #[schema(example = "OSM")]
    pub source: String,
    #[schema(example = "AFR")]
    pub region: String,
    #[schema(example = "FLOOD")]
    pub category: String,
    /// ISO 3166-1 alpha-2 codes, sorted.
    #[schema(example = json!(["KE", "UG"]))]
    pub countries: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Time-limited URL of the image.
    pub image_url: String,
}

impl From<MapView> for MapResponse {
    fn from(view: MapView) -> Self {
        let record = view.record;
        Self {
            map_id: record.id,
            file_key: record.file_key,
            sha256: record.digest.to_hex(),
            source: record.fields.source,
            region: record.fields.region,
            category: record.fields.category,
            countries: view.countries,
            created_at: record.created_at,
            image_url: view.image_url,
        }
    }
}
