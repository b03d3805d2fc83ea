use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::extract::multipart::Field;
use axum::http::StatusCode;
use common::storage::resolve_content_type;
use tracing::instrument;

use super::parse_id;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::JsonBody;
use crate::lookup::LookupSets;
use crate::maps::{self, MapFields, UploadRequest};
use crate::models::map::{MapResponse, UploadMapResponse};
use crate::state::AppState;

/// Headroom above the blob limit for multipart framing and text fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Largest request body accepted for an upload of at most `max_blob_size` bytes.
fn upload_body_bytes(max_blob_size: u64) -> usize {
    usize::try_from(max_blob_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD)
}

pub fn map_upload_body_limit(max_blob_size: u64) -> DefaultBodyLimit {
    DefaultBodyLimit::max(upload_body_bytes(max_blob_size))
}

#[derive(Default)]
struct UploadForm {
    source: Option<String>,
    region: Option<String>,
    category: Option<String>,
    countries: Vec<String>,
    file: Option<(Vec<u8>, String)>,
}

impl UploadForm {
    /// The enumerated fields, once all three have been seen.
    fn fields(&self) -> Option<MapFields> {
        Some(MapFields {
            source: self.source.clone()?,
            region: self.region.clone()?,
            category: self.category.clone()?,
        })
    }

    fn into_request(self) -> Result<UploadRequest, AppError> {
        let required = |value: Option<String>, name: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::Validation(format!("Missing '{name}' field")))
        };
        let fields = MapFields {
            source: required(self.source, "source")?,
            region: required(self.region, "region")?,
            category: required(self.category, "category")?,
        };
        let (data, content_type) = self
            .file
            .ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
        Ok(UploadRequest {
            fields,
            countries: self.countries,
            content_type,
            data,
        })
    }
}

/// Split a `countries` value that may hold one code or a comma-separated list.
fn split_countries(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

async fn read_text(field: Field<'_>, name: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))
}

/// Buffer a file field, enforcing the size limit as chunks arrive.
async fn read_file(mut field: Field<'_>, max_size: u64) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        if (data.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn read_form(
    multipart: &mut Multipart,
    lookups: &LookupSets,
    max_size: u64,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => {
                // Reject bad codes before spending time on the body.
                if let Some(fields) = form.fields() {
                    lookups.validate_fields(&fields)?;
                }
                lookups.validate_countries(&form.countries)?;
                let content_type = resolve_content_type(field.content_type(), field.file_name());
                let data = read_file(field, max_size).await?;
                form.file = Some((data, content_type));
            }
            Some("source") => form.source = Some(read_text(field, "source").await?),
            Some("region") => form.region = Some(read_text(field, "region").await?),
            Some("category") => form.category = Some(read_text(field, "category").await?),
            Some("countries") => {
                let raw = read_text(field, "countries").await?;
                form.countries.extend(split_countries(&raw));
            }
            _ => {} // Ignore unknown fields.
        }
    }

    Ok(form)
}

#[utoipa::path(
    post,
    path = "/maps",
    tag = "Maps",
    operation_id = "uploadMap",
    summary = "Upload a map image",
    description = "Stores the `file` part under a content-derived key and records its metadata. \
        `source`, `region` and `category` are required and must be known codes. `countries` is \
        optional and may be repeated or comma-separated.",
    request_body(content_type = "multipart/form-data", description = "Image file plus metadata fields"),
    responses(
        (status = 200, description = "Map stored", body = UploadMapResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Store failure (STORAGE_ERROR, PERSISTENCE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_map(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadMapResponse>, AppError> {
    let form = read_form(
        &mut multipart,
        &state.lookups,
        state.config.storage.max_blob_size,
    )
    .await?;
    let outcome = state.uploads.upload(form.into_request()?).await?;

    Ok(Json(UploadMapResponse {
        map_id: outcome.map_id,
    }))
}

#[utoipa::path(
    get,
    path = "/maps/{id}",
    tag = "Maps",
    operation_id = "getMap",
    summary = "Get a map",
    description = "Returns the map record, its countries and a time-limited image URL.",
    params(("id" = String, Path, description = "Map ID (UUID)")),
    responses(
        (status = 200, description = "Map found", body = MapResponse),
        (status = 400, description = "Malformed id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Map not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Store failure (STORAGE_ERROR, PERSISTENCE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(map_id = %id))]
pub async fn get_map(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MapResponse>, AppError> {
    let id = parse_id(&id, "map")?;
    let view = maps::resolve_map(&state.recorder, &state.links, id).await?;
    Ok(Json(MapResponse::from(view)))
}

#[utoipa::path(
    put,
    path = "/maps/{id}/metadata",
    tag = "Maps",
    operation_id = "updateMapMetadata",
    summary = "Replace a map's source, region and category",
    params(("id" = String, Path, description = "Map ID (UUID)")),
    request_body = MapFields,
    responses(
        (status = 204, description = "Metadata updated"),
        (status = 400, description = "Invalid body or unknown code (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Map not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Database failure (PERSISTENCE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip_all, fields(map_id = %id))]
pub async fn update_map_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<MapFields>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "map")?;
    state.lookups.validate_fields(&payload)?;

    if !state.recorder.update_fields(id, &payload).await? {
        return Err(AppError::NotFound(format!("map {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
