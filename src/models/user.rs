//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Authenticated athlete stored in the `users` table.
///
/// Created on the first successful OAuth exchange, updated on every token
/// refresh and profile fetch, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Internal ID (primary key, assigned on creation)
    pub id: i64,
    /// Strava athlete ID (unique per athlete)
    pub athlete_id: i64,
    /// OAuth access token
    pub access_token: String,
    /// OAuth refresh token
    pub refresh_token: String,
    /// Access token expiry (epoch seconds)
    pub expires_at: i64,
    /// Granted OAuth scope
    pub scope: String,
    /// Display name (unset until the first profile fetch)
    pub name: Option<String>,
    /// Serialized shoe catalog: JSON array of `{id, name}` objects
    pub shoes: String,
}
