use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(upload_routes(config))
        .routes(routes!(handlers::map::get_map))
        .routes(routes!(handlers::map::update_map_metadata))
        .routes(routes!(handlers::caption::create_caption))
        .routes(routes!(handlers::caption::get_caption))
        .routes(routes!(handlers::lookup::get_lookups))
}

fn upload_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::map::upload_map))
        .layer(handlers::map::map_upload_body_limit(
            config.storage.max_blob_size,
        ))
}
