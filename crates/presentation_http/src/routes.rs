//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use infrastructure::ServerConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{handlers, state::AppState};

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/transcribe", post(handlers::transcribe::transcribe_upload))
        .route("/transcribe-blob", post(handlers::transcribe::transcribe_blob))
        .with_state(state)
}

/// CORS policy: any origin unless origins are configured
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();
    layer.allow_origin(origins)
}

/// Router with body limits, tracing and CORS applied
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    let mut app = create_router(state)
        .layer(DefaultBodyLimit::max(config.max_body_size_bytes))
        .layer(RequestBodyLimitLayer::new(config.max_body_size_bytes))
        .layer(TraceLayer::new_for_http());

    if config.cors_enabled {
        app = app.layer(cors_layer(config));
    }
    app
}
