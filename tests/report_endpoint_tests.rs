// SPDX-License-Identifier: MIT

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{activity, create_test_app, seed_user};
use http_body_util::BodyExt;
use tower::ServiceExt;

const CATALOG: &str = r#"[{"id":"g1","name":"Pegasus 40"},{"id":"g2","name":"Allez Sprint"}]"#;

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_runstats_end_to_end() {
    let (app, state, _static_dir) = create_test_app().await;

    seed_user(&state.db, 100, CATALOG).await;
    for a in [
        activity(100, 1, "Run", 5000.0, 2.5, Some("g1")),
        activity(100, 2, "Run", 10000.0, 3.0, Some("g1")),
        activity(100, 3, "Ride", 20000.0, 8.0, Some("g2")),
    ] {
        state.db.upsert_activity(&a).await.unwrap();
    }

    let (status, body) = get(app, "/runstats/100").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let table = json["table"].as_array().unwrap();

    // The ride is excluded entirely, so only the running shoe appears
    assert_eq!(table.len(), 1);
    assert_eq!(table[0]["gear"], "Pegasus 40");
    assert_eq!(table[0]["runs"], 2);
    assert_eq!(table[0]["avg_pace"], "06:06");
    assert_eq!(table[0]["avg_distance_km"], 7.5);

    assert_eq!(json["charts"]["scatter_plot"], "/static/scatter_plot.svg");
    assert_eq!(json["charts"]["box_plot"], "/static/box_plot_no_outliers.svg");
    assert_eq!(
        json["charts"]["pace_distance_scatter_plot"],
        "/static/pace_distance_scatter_plot.svg"
    );
}

#[tokio::test]
async fn test_runstats_writes_chart_artifacts() {
    let (app, state, static_dir) = create_test_app().await;

    seed_user(&state.db, 100, CATALOG).await;
    state
        .db
        .upsert_activity(&activity(100, 1, "Run", 5000.0, 2.5, Some("g1")))
        .await
        .unwrap();

    let (status, _) = get(app, "/runstats/100").await;
    assert_eq!(status, StatusCode::OK);

    for name in [
        "scatter_plot.svg",
        "box_plot_no_outliers.svg",
        "pace_distance_scatter_plot.svg",
    ] {
        let path = static_dir.path().join(name);
        assert!(path.exists(), "missing chart artifact {}", name);
    }
}

#[tokio::test]
async fn test_runstats_empty_athlete_yields_empty_table() {
    let (app, _state, _static_dir) = create_test_app().await;

    let (status, body) = get(app, "/runstats/4242").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["table"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_runstats_without_user_row_labels_gear_unknown() {
    let (app, state, _static_dir) = create_test_app().await;

    // Activities exist but no user row, so no catalog is available
    state
        .db
        .upsert_activity(&activity(100, 1, "Run", 5000.0, 2.5, Some("g1")))
        .await
        .unwrap();

    let (status, body) = get(app, "/runstats/100").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let table = json["table"].as_array().unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table[0]["gear"], "Unknown");
}

#[tokio::test]
async fn test_runstats_group_with_no_valid_pace_is_null() {
    let (app, state, _static_dir) = create_test_app().await;

    seed_user(&state.db, 100, CATALOG).await;
    state
        .db
        .upsert_activity(&activity(100, 1, "Run", 5000.0, 0.0, Some("g1")))
        .await
        .unwrap();

    let (status, body) = get(app, "/runstats/100").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let table = json["table"].as_array().unwrap();
    assert_eq!(table[0]["runs"], 1);
    assert!(table[0]["avg_pace"].is_null());
}

#[tokio::test]
async fn test_stats_page_renders_html() {
    let (app, state, _static_dir) = create_test_app().await;

    seed_user(&state.db, 100, CATALOG).await;
    state
        .db
        .upsert_activity(&activity(100, 1, "Run", 5000.0, 2.5, Some("g1")))
        .await
        .unwrap();

    let (status, body) = get(app, "/stats/100").await;
    assert_eq!(status, StatusCode::OK);

    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Pegasus 40"));
    assert!(html.contains("/static/scatter_plot.svg"));
}

#[tokio::test]
async fn test_stats_page_for_empty_athlete() {
    let (app, _state, _static_dir) = create_test_app().await;

    let (status, body) = get(app, "/stats/4242").await;
    assert_eq!(status, StatusCode::OK);

    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("No runs imported yet"));
}
