// SPDX-License-Identifier: MIT

//! Activity import trigger.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/fetch_activities/{user_id}", get(fetch_activities))
}

#[derive(Serialize)]
pub struct FetchActivitiesResponse {
    pub message: String,
}

/// Run a full activity import for the user.
///
/// Acknowledges success even when the run halted partway: committed pages
/// stay, and re-triggering is idempotent thanks to the upsert key.
async fn fetch_activities(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<FetchActivitiesResponse>> {
    let user = state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?;

    let outcome = state.importer.import_all(&user).await?;
    tracing::info!(
        user_id,
        imported = outcome.activities_imported,
        halted = outcome.halted,
        "Import triggered via API"
    );

    Ok(Json(FetchActivitiesResponse {
        message: "Activities fetched and stored successfully!".to_string(),
    }))
}
