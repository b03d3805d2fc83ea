use serde::Serialize;
use uuid::Uuid;

use crate::maps::{CreatedCaption, ResolvedCaption};

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptionCreatedResponse {
    pub caption_id: Uuid,
    /// Generated caption text.
    #[schema(example = "Stub caption: replace me")]
    pub generated: String,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptionResponse {
    /// Time-limited URL of the captioned image.
    #[schema(example = "/static/maps/2024/03/07/ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad.png")]
    pub image_url: String,
    pub generated: String,
}

impl From<CreatedCaption> for CaptionCreatedResponse {
    fn from(caption: CreatedCaption) -> Self {
        Self {
            caption_id: caption.id,
            generated: caption.generated,
        }
    }
}

impl From<ResolvedCaption> for CaptionResponse {
    fn from(caption: ResolvedCaption) -> Self {
        Self {
            image_url: caption.image_url,
            generated: caption.generated,
        }
    }
}
