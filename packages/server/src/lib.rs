pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod lookup;
pub mod maps;
pub mod models;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{CorsConfig, StorageConfig, StorageDriver};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Map Vault API",
        version = "1.0.0",
        description = "Content-addressed storage and captioning for crisis map images"
    ),
    tags(
        (name = "Maps", description = "Map upload, retrieval and metadata"),
        (name = "Captions", description = "Generated captions for stored maps"),
        (name = "Lookups", description = "Accepted metadata codes"),
    ),
)]
struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes(&state.config))
        .split_for_parts();

    let cors = cors_layer(&state.config.server.cors);
    let storage = state.config.storage.clone();

    let router = router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api));

    mount_local_blobs(router, &storage)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serve the local blob root at its public prefix so `link` URLs resolve.
fn mount_local_blobs(router: axum::Router, storage: &StorageConfig) -> axum::Router {
    if storage.driver != StorageDriver::Local {
        return router;
    }
    if !storage.local.public_prefix.starts_with('/') {
        // Absolute URL: something else serves the files.
        return router;
    }
    let prefix = storage.local.public_prefix.trim_end_matches('/');
    tracing::info!(root = %storage.local.root.display(), prefix, "Serving local blobs");
    let files = ServeDir::new(&storage.local.root);
    if prefix.is_empty() {
        router.fallback_service(files)
    } else {
        router.nest_service(prefix, files)
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age));

    if config.allow_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
