// SPDX-License-Identifier: MIT

use shoe_insights::config::Config;
use shoe_insights::db::Db;
use shoe_insights::models::NewActivity;
use shoe_insights::routes::create_router;
use shoe_insights::services::{ActivityImporter, ChartRenderer, StravaService};
use shoe_insights::time_utils::now_epoch;
use shoe_insights::AppState;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    Db::in_memory().await.expect("in-memory database")
}

/// Create a test app backed by an in-memory database and a temporary
/// static directory. The returned `TempDir` must be kept alive for the
/// duration of the test.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>, TempDir) {
    let static_dir = tempfile::tempdir().expect("temp static dir");

    let mut config = Config::test_default();
    config.static_dir = static_dir.path().to_string_lossy().into_owned();

    let db = test_db().await;
    let strava = StravaService::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
        db.clone(),
    );
    let importer = ActivityImporter::new(strava.clone(), db.clone());
    let charts = ChartRenderer::new(static_dir.path());

    let state = Arc::new(AppState {
        config,
        db,
        strava,
        importer,
        charts,
    });

    (create_router(state.clone()), state, static_dir)
}

/// Seed a user with valid-looking credentials and a shoe catalog.
/// Returns the internal user ID.
#[allow(dead_code)]
pub async fn seed_user(db: &Db, athlete_id: i64, shoes: &str) -> i64 {
    let user_id = db
        .upsert_user_credentials(
            athlete_id,
            "test_access_token",
            "test_refresh_token",
            now_epoch() + 3600,
            "profile:read_all,activity:read_all",
        )
        .await
        .expect("seed user");

    db.update_user_profile(athlete_id, Some("Test Athlete"), shoes)
        .await
        .expect("seed profile");

    user_id
}

/// Build an activity of the given type for seeding.
#[allow(dead_code)]
pub fn activity(
    athlete_id: i64,
    activity_id: i64,
    activity_type: &str,
    distance: f64,
    average_speed: f64,
    gear_id: Option<&str>,
) -> NewActivity {
    NewActivity {
        athlete_id,
        activity_id,
        start_date: "2024-01-15T10:00:00Z".to_string(),
        activity_type: activity_type.to_string(),
        elapsed_time: 3600,
        moving_time: 3500,
        distance: Some(distance),
        average_speed: Some(average_speed),
        gear_id: gear_id.map(String::from),
    }
}
