use axum::Json;
use axum::extract::State;

use crate::models::lookup::LookupsResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/lookups",
    tag = "Lookups",
    operation_id = "getLookups",
    summary = "List accepted metadata codes",
    responses(
        (status = 200, description = "Code lists", body = LookupsResponse),
    ),
)]
pub async fn get_lookups(State(state): State<AppState>) -> Json<LookupsResponse> {
    Json(LookupsResponse::from(state.lookups.as_ref()))
}
