// SPDX-License-Identifier: MIT

//! Strava API client for OAuth and activity listing.
//!
//! Handles:
//! - Authorization-code exchange and token refresh
//! - Athlete profile fetch (name + shoe catalog)
//! - Paginated activity listing
//! - Deauthorization

use serde::Deserialize;

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{Gear, User};
use crate::time_utils::now_epoch;

const OAUTH_TOKEN_URL: &str = "https://www.strava.com/oauth/token";
const OAUTH_DEAUTHORIZE_URL: &str = "https://www.strava.com/oauth/deauthorize";

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://www.strava.com/api/v3".to_string(),
            client_id,
            client_secret,
        }
    }

    /// Exchange an authorization code for a token triple.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchangeResponse> {
        let response = self
            .http
            .post(OAUTH_TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token exchange failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRefreshResponse> {
        let response = self
            .http
            .post(OAUTH_TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Get the authenticated athlete's profile summary.
    pub async fn get_athlete(&self, access_token: &str) -> Result<StravaAthlete> {
        let url = format!("{}/athlete", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// List one page of the athlete's activities.
    pub async fn list_activities(
        &self,
        access_token: &str,
        before: i64,
        after: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("before", before.to_string()),
                ("after", after.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Deauthorize the application for a user.
    ///
    /// This invalidates all access and refresh tokens for the user
    /// and removes the app from their Strava settings.
    pub async fn deauthorize(&self, access_token: &str) -> Result<()> {
        let response = self
            .http
            .post(OAUTH_DEAUTHORIZE_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Deauthorization request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        tracing::info!("Strava deauthorization successful");
        Ok(())
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

/// Token exchange response from Strava OAuth (includes athlete info).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    #[serde(default)]
    pub scope: Option<String>,
    pub athlete: TokenExchangeAthlete,
}

/// Athlete stub embedded in the token exchange response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeAthlete {
    pub id: i64,
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Athlete summary from `GET /athlete`.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaAthlete {
    pub id: i64,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub shoes: Vec<StravaGear>,
}

/// One shoe in the athlete summary.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaGear {
    pub id: String,
    pub name: String,
}

/// Summary activity from the list endpoint. Only the fields the importer
/// persists are extracted; everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivitySummary {
    pub id: i64,
    pub start_date: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub elapsed_time: i64,
    #[serde(default)]
    pub moving_time: i64,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub average_speed: Option<f64>,
    #[serde(default)]
    pub gear_id: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - High-level service with token management
// ─────────────────────────────────────────────────────────────────────────────

/// High-level Strava service that manages the token lifecycle and wraps the
/// API calls the rest of the application needs.
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    db: Db,
}

/// Result of handling an OAuth callback.
#[derive(Debug, Clone)]
pub struct OAuthResult {
    pub user_id: i64,
    pub athlete_id: i64,
}

impl StravaService {
    pub fn new(client_id: String, client_secret: String, db: Db) -> Self {
        Self {
            client: StravaClient::new(client_id, client_secret),
            db,
        }
    }

    // ─── Token Management ────────────────────────────────────────

    /// Get a valid access token for the user.
    ///
    /// Returns the stored token if it has not expired. Otherwise exchanges
    /// the refresh token for a new triple, persists it on the user row, and
    /// returns the new access token. A refresh rejected by Strava is logged
    /// and yields `Ok(None)`: callers must treat the absence of a token as
    /// "cannot proceed". Persistence failures are real errors.
    pub async fn get_valid_access_token(&self, user: &User) -> Result<Option<String>> {
        if user.expires_at > now_epoch() {
            return Ok(Some(user.access_token.clone()));
        }

        tracing::info!(athlete_id = user.athlete_id, "Access token expired, refreshing");

        let tokens = match self.client.refresh_token(&user.refresh_token).await {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    athlete_id = user.athlete_id,
                    "Token refresh failed, no usable token"
                );
                return Ok(None);
            }
        };

        self.db
            .update_user_tokens(
                user.athlete_id,
                &tokens.access_token,
                &tokens.refresh_token,
                tokens.expires_at,
            )
            .await?;

        Ok(Some(tokens.access_token))
    }

    // ─── OAuth Callback Handling ─────────────────────────────────

    /// Handle an OAuth callback: exchange the code, store or update the
    /// user's credentials, and refresh their profile and shoe catalog.
    pub async fn handle_oauth_callback(&self, code: &str) -> Result<OAuthResult> {
        let tokens = self.client.exchange_code(code).await?;
        let athlete_id = tokens.athlete.id;

        let user_id = self
            .db
            .upsert_user_credentials(
                athlete_id,
                &tokens.access_token,
                &tokens.refresh_token,
                tokens.expires_at,
                tokens.scope.as_deref().unwrap_or(""),
            )
            .await?;

        // The shoe catalog snapshot rides along with every successful
        // exchange; a failed profile fetch must not fail the login.
        if let Err(e) = self
            .refresh_athlete_profile(athlete_id, &tokens.access_token)
            .await
        {
            tracing::warn!(error = %e, athlete_id, "Failed to refresh athlete profile");
        }

        tracing::info!(athlete_id, user_id, "OAuth callback handled, credentials stored");

        Ok(OAuthResult {
            user_id,
            athlete_id,
        })
    }

    /// Fetch the athlete summary and store the display name and shoe
    /// catalog snapshot on the user row.
    pub async fn refresh_athlete_profile(
        &self,
        athlete_id: i64,
        access_token: &str,
    ) -> Result<()> {
        let athlete = self.client.get_athlete(access_token).await?;

        let shoes: Vec<Gear> = athlete
            .shoes
            .into_iter()
            .map(|g| Gear {
                id: g.id,
                name: g.name,
            })
            .collect();
        let shoe_count = shoes.len();
        let shoes_json = serde_json::to_string(&shoes)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Shoe catalog encode: {}", e)))?;

        self.db
            .update_user_profile(athlete_id, athlete.firstname.as_deref(), &shoes_json)
            .await?;

        tracing::info!(athlete_id, shoes = shoe_count, "Athlete profile updated");
        Ok(())
    }

    // ─── API Wrappers ────────────────────────────────────────────

    /// List one page of activities with an already-validated token.
    pub async fn list_activities_page(
        &self,
        access_token: &str,
        before: i64,
        after: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>> {
        self.client
            .list_activities(access_token, before, after, page, per_page)
            .await
    }

    /// Deauthorize with a specific token.
    pub async fn deauthorize_with_token(&self, access_token: &str) -> Result<()> {
        self.client.deauthorize(access_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_summary_deserializes_type_field() {
        let json = r#"{
            "id": 987654,
            "start_date": "2024-03-02T08:15:00Z",
            "type": "Run",
            "elapsed_time": 1900,
            "moving_time": 1800,
            "distance": 5000.0,
            "average_speed": 2.5,
            "gear_id": "g1",
            "kudos_count": 7
        }"#;

        let summary: StravaActivitySummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.activity_type, "Run");
        assert_eq!(summary.gear_id.as_deref(), Some("g1"));
        assert_eq!(summary.average_speed, Some(2.5));
    }

    #[test]
    fn test_activity_summary_tolerates_missing_fields() {
        let json = r#"{"id": 1, "start_date": "2024-03-02T08:15:00Z", "type": "Ride"}"#;

        let summary: StravaActivitySummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.elapsed_time, 0);
        assert_eq!(summary.distance, None);
        assert_eq!(summary.gear_id, None);
    }

    #[test]
    fn test_athlete_summary_defaults_to_empty_shoes() {
        let json = r#"{"id": 42, "firstname": "Ada"}"#;

        let athlete: StravaAthlete = serde_json::from_str(json).unwrap();
        assert!(athlete.shoes.is_empty());
        assert_eq!(athlete.firstname.as_deref(), Some("Ada"));
    }
}
