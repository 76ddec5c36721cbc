//! Route configuration and setup

use crate::auth::{auth_middleware, AuthState};
use crate::handlers;
use crate::middleware::error_details_middleware;
use crate::state::AppState;
use crate::utils::upload::request_body_limit;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::Config;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config);
    Ok(build_router(state).layer(cors))
}

/// Router without CORS, shared by the server and integration tests.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut app = public_routes().merge(protected_routes(state.clone()));

    if let Some(dir) = &state.assets_dir {
        app = app.nest_service("/assets", ServeDir::new(dir));
    }

    app.layer(axum::middleware::from_fn_with_state(
        state.error_details,
        error_details_middleware,
    ))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn setup_cors(config: &Config) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any)
}

/// Public routes (no authentication required)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

/// Protected routes (require a bearer token)
fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let auth_state = Arc::new(AuthState {
        verifier: state.jwt.clone(),
    });

    Router::new()
        .route(
            "/videos/{video_id}/thumbnail",
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
        .layer(DefaultBodyLimit::max(request_body_limit(
            state.upload.max_thumbnail_size_bytes,
        )))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
}
