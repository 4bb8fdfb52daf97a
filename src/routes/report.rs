// SPDX-License-Identifier: MIT

//! Per-shoe statistics report.

use axum::{
    extract::{Path, State},
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::models::stats::compute_gear_report;
use crate::models::{GearCatalog, GearReport, GearStatsRow};
use crate::services::ChartArtifacts;
use crate::templates;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stats/{athlete_id}", get(stats_page))
        .route("/runstats/{athlete_id}", get(runstats))
}

/// Aggregated table plus the served chart locations.
#[derive(Serialize)]
pub struct RunStatsResponse {
    pub table: Vec<GearStatsRow>,
    pub charts: ChartArtifacts,
}

/// Compute the report and render its chart artifacts.
///
/// An athlete with no stored activities gets an empty table, not an error.
/// An athlete with no user row (or an empty catalog) gets every shoe
/// labeled "Unknown".
async fn build_report(
    state: &AppState,
    athlete_id: i64,
) -> Result<(GearReport, ChartArtifacts)> {
    let activities = state.db.activities_for_athlete(athlete_id).await?;

    let catalog = match state.db.get_user_by_athlete(athlete_id).await? {
        Some(user) => GearCatalog::from_user(&user),
        None => {
            tracing::warn!(athlete_id, "No user row for athlete, shoe mapping unavailable");
            GearCatalog::default()
        }
    };

    let report = compute_gear_report(&activities, &catalog);
    let charts = state.charts.render_all(&report)?;

    tracing::info!(
        athlete_id,
        runs = report.samples.len(),
        shoes = report.table.len(),
        "Report computed"
    );

    Ok((report, charts))
}

/// HTML report view.
async fn stats_page(
    State(state): State<Arc<AppState>>,
    Path(athlete_id): Path<i64>,
) -> Result<Html<String>> {
    let (report, charts) = build_report(&state, athlete_id).await?;
    Ok(Html(templates::render_stats_page(&report.table, &charts)))
}

/// JSON report: table rows plus chart artifact locations.
async fn runstats(
    State(state): State<Arc<AppState>>,
    Path(athlete_id): Path<i64>,
) -> Result<Json<RunStatsResponse>> {
    let (report, charts) = build_report(&state, athlete_id).await?;
    Ok(Json(RunStatsResponse {
        table: report.table,
        charts,
    }))
}
