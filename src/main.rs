// SPDX-License-Identifier: MIT

//! Shoe Insights server.

use shoe_insights::{
    config::Config,
    db::Db,
    services::{ActivityImporter, ChartRenderer, StravaService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Shoe Insights");

    // Open the database and ensure the schema exists
    let db = Db::connect(&config.database_url)
        .await
        .expect("Failed to open database");

    let strava = StravaService::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
        db.clone(),
    );
    let importer = ActivityImporter::new(strava.clone(), db.clone());
    let charts = ChartRenderer::new(config.static_dir.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        strava,
        importer,
        charts,
    });

    // Build router
    let app = shoe_insights::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize logging with an environment-controlled filter.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shoe_insights=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
