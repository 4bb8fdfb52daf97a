// SPDX-License-Identifier: MIT

//! Shoe Insights: per-shoe running statistics from Strava.
//!
//! This crate links a Strava account, imports the athlete's activity
//! history, and reports run count, average pace, and average distance
//! grouped by the shoe used.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod templates;
pub mod time_utils;

use config::Config;
use db::Db;
use services::{ActivityImporter, ChartRenderer, StravaService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub strava: StravaService,
    pub importer: ActivityImporter,
    pub charts: ChartRenderer,
}
