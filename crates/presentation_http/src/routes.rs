//! Route definitions

use axum::{
    Router,
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

use crate::{handlers, middleware::RequestIdLayer, state::AppState};

/// Create the main router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let server = state.config.server.clone();
    let production = state.config.is_production();

    let router = Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Smart tagging API (v1)
        .route(
            "/v1/reservations/analyze-tags",
            post(handlers::tags::analyze_tags),
        )
        .route(
            "/v1/customers/{customer_id}/tags",
            get(handlers::tags::get_customer_tags),
        )
        .route(
            "/v1/analysis-history",
            get(handlers::history::get_analysis_history),
        )
        .route("/v1/notifications", get(handlers::history::get_notifications))
        .route("/v1/demo-scenarios", get(handlers::demo::get_demo_scenarios))
        .with_state(state);

    // Layers added later wrap the earlier ones
    let router = router
        .layer(RequestBodyLimitLayer::new(server.max_body_size_json_bytes))
        .layer(TraceLayer::new_for_http());

    let router = match cors_layer(&server, production) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(RequestIdLayer)
}

/// CORS policy: any origin in development, the configured origins otherwise
fn cors_layer(server: &ServerConfig, production: bool) -> Option<CorsLayer> {
    if !server.cors_enabled {
        return None;
    }

    if !production && server.allowed_origins.is_empty() {
        return Some(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    let origins: Vec<HeaderValue> = server
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

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    )
}
