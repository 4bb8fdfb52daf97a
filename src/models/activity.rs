// SPDX-License-Identifier: MIT

//! Strava activity model for storage and API.

use serde::{Deserialize, Serialize};

/// Stored activity record in the `activities` table.
///
/// `(athlete_id, activity_id)` is unique; the importer upserts on that pair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Activity {
    /// Internal ID (primary key)
    pub id: i64,
    /// Strava athlete ID (owner)
    pub athlete_id: i64,
    /// Strava activity ID (unique per athlete)
    pub activity_id: i64,
    /// Start date/time (RFC 3339)
    pub start_date: String,
    /// Activity type (Run, Ride, Hike, etc.)
    pub activity_type: String,
    /// Elapsed time in seconds
    pub elapsed_time: i64,
    /// Moving time in seconds
    pub moving_time: i64,
    /// Distance in meters
    pub distance: Option<f64>,
    /// Average speed in meters per second
    pub average_speed: Option<f64>,
    /// Gear ID referencing the owner's shoe catalog
    pub gear_id: Option<String>,
    /// Never populated by the importer; pace is recomputed at report time.
    pub pace: Option<f64>,
}

/// Activity payload produced by the importer, before an internal ID exists.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub athlete_id: i64,
    pub activity_id: i64,
    pub start_date: String,
    pub activity_type: String,
    pub elapsed_time: i64,
    pub moving_time: i64,
    pub distance: Option<f64>,
    pub average_speed: Option<f64>,
    pub gear_id: Option<String>,
}
