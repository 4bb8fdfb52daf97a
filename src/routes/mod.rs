// SPDX-License-Identifier: MIT

//! HTTP route handlers.

pub mod auth;
pub mod debug;
pub mod import;
pub mod report;

use crate::templates;
use crate::AppState;
use axum::response::Html;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Landing page with the Strava connect link.
async fn landing_page() -> Html<String> {
    Html(templates::render_landing_page())
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/", get(landing_page))
        .route("/health", get(health_check))
        .merge(auth::routes())
        .merge(import::routes())
        .merge(report::routes())
        .merge(debug::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
