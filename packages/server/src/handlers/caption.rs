use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use super::parse_id;
use crate::error::{AppError, ErrorBody};
use crate::maps;
use crate::models::caption::{CaptionCreatedResponse, CaptionResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/maps/{id}/caption",
    tag = "Captions",
    operation_id = "createCaption",
    summary = "Generate a caption for a map",
    params(("id" = String, Path, description = "Map ID (UUID)")),
    responses(
        (status = 200, description = "Caption created", body = CaptionCreatedResponse),
        (status = 400, description = "Malformed id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Map not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Database failure (PERSISTENCE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(map_id = %id))]
pub async fn create_caption(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CaptionCreatedResponse>, AppError> {
    let map_id = parse_id(&id, "map")?;
    let created = maps::create_caption(&state.recorder, state.captioner.as_ref(), map_id).await?;
    Ok(Json(created.into()))
}

#[utoipa::path(
    get,
    path = "/captions/{id}",
    tag = "Captions",
    operation_id = "getCaption",
    summary = "Get a caption with a link to its image",
    params(("id" = String, Path, description = "Caption ID (UUID)")),
    responses(
        (status = 200, description = "Caption found", body = CaptionResponse),
        (status = 400, description = "Malformed id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Caption not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Link failure (STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(caption_id = %id))]
pub async fn get_caption(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CaptionResponse>, AppError> {
    let caption_id = parse_id(&id, "caption")?;
    let resolved = maps::resolve_caption(&state.recorder, &state.links, caption_id).await?;
    Ok(Json(resolved.into()))
}
