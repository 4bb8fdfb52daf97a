// SPDX-License-Identifier: MIT

//! Strava OAuth authorization routes.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::templates;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/authorize", get(authorize))
        .route("/authorization/callback", get(authorization_callback))
        .route("/authorization/success/{user_id}", get(authorization_success))
        .route("/logout/{user_id}", get(logout))
}

/// Start the OAuth flow - redirect to Strava's authorization page.
async fn authorize(State(state): State<Arc<AppState>>) -> Redirect {
    let auth_url = format!(
        "https://www.strava.com/oauth/authorize?\
         client_id={}&\
         redirect_uri={}&\
         response_type=code&\
         scope=profile:read_all,activity:read_all",
        state.config.strava_client_id,
        urlencoding::encode(&state.config.oauth_redirect_uri()),
    );

    tracing::info!(
        client_id = %state.config.strava_client_id,
        "Starting OAuth flow, redirecting to Strava"
    );

    Redirect::temporary(&auth_url)
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange the code for tokens and store the user.
///
/// A declined consent screen is a dedicated view, not an error.
async fn authorization_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    if params.error.as_deref() == Some("access_denied") {
        tracing::info!("Authorization denied by user");
        return Ok(Html(templates::render_authorization_denied()).into_response());
    }

    if let Some(error) = params.error {
        return Err(AppError::BadRequest(format!("OAuth error: {}", error)));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let result = state.strava.handle_oauth_callback(&code).await?;

    Ok(Redirect::temporary(&format!("/authorization/success/{}", result.user_id)).into_response())
}

/// Post-authorization success view.
async fn authorization_success(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Html<String>> {
    let user = state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?;

    Ok(Html(templates::render_authorization_success(
        user.name.as_deref(),
        user.athlete_id,
        user.id,
    )))
}

/// Deauthorize the user's token with Strava and return to the landing page.
async fn logout(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Redirect> {
    let user = state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?;

    state.strava.deauthorize_with_token(&user.access_token).await?;

    tracing::info!(athlete_id = user.athlete_id, "User deauthorized");
    Ok(Redirect::temporary("/"))
}
