pub mod models;
pub mod rating;
pub mod restaurant;

// Re-exports
pub use models::*;

use crate::config::ServerConfig;
use anyhow::Context;
use axum::{extract::State, http::HeaderValue, routing::get, Json, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

/// Liveness plus record counts, served outside the version prefix
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        total_restaurants: state.db.count_restaurants().await?,
        total_ratings: state.db.count_ratings().await?,
    }))
}

/// Build the full router: versioned resource routes plus `/health`.
pub fn router(state: AppState, server: &ServerConfig) -> anyhow::Result<Router> {
    let origin: HeaderValue = server
        .cors_origin
        .parse()
        .with_context(|| format!("Invalid CORS origin {:?}", server.cors_origin))?;

    // Credentials cannot be combined with wildcards, so methods and
    // headers are mirrored from the preflight request instead.
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let versioned = Router::new()
        .merge(rating::routes())
        .merge(restaurant::routes());

    Ok(Router::new()
        .route("/health", get(health_handler))
        .nest(&server.api_prefix(), versioned)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
