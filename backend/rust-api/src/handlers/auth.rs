use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_sessions::Session;
use validator::Validate;

use crate::{
    extractors::{AppJson, SESSION_ROUND_KEY, SESSION_USER_KEY},
    middlewares::access::SESSION_ACCESS_KEY,
    models::{
        quiz::RoundState,
        user::{LoginRequest, RegisterRequest, SessionUser, UserProfile},
    },
    services::{auth_service::AuthService, AppState},
};

#[derive(Debug, Deserialize)]
pub struct AccessRequest {
    pub code: String,
}

/// GET /api/v1/access - the gate clients are redirected to
pub async fn access_prompt() -> impl IntoResponse {
    Json(json!({ "message": "Access code required" }))
}

/// POST /api/v1/access - present the shared access code
pub async fn grant_access(
    State(state): State<Arc<AppState>>,
    session: Session,
    AppJson(req): AppJson<AccessRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.code != state.config.access_code {
        tracing::warn!("Access code rejected");
        return Err((StatusCode::FORBIDDEN, "Invalid access code".to_string()));
    }

    session
        .insert(SESSION_ACCESS_KEY, true)
        .await
        .map_err(session_error)?;

    Ok(Json(json!({ "access_granted": true })))
}

/// POST /api/v1/auth/register - Register a new user
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Err(e) = req.validate() {
        return Err((StatusCode::BAD_REQUEST, format!("Validation error: {}", e)));
    }

    tracing::info!("Registering new user: {}", req.username);

    let service = AuthService::new(state.db.clone());

    match service.register(req).await {
        Ok(profile) => {
            tracing::info!("User registered successfully");
            establish_session(&session, &profile).await?;
            Ok((StatusCode::CREATED, Json(profile)))
        }
        Err(e) => {
            tracing::warn!("Failed to register user: {}", e);
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}

/// POST /api/v1/auth/login - Login with username and password
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Err(e) = req.validate() {
        return Err((StatusCode::BAD_REQUEST, format!("Validation error: {}", e)));
    }

    tracing::info!("Login attempt for user: {}", req.username);

    let service = AuthService::new(state.db.clone());

    match service.login(req).await {
        Ok(profile) => {
            tracing::info!("User logged in successfully");
            session.cycle_id().await.map_err(session_error)?;
            establish_session(&session, &profile).await?;
            Ok((StatusCode::OK, Json(profile)))
        }
        Err(e) => {
            tracing::warn!("Failed login: {}", e);
            Err((StatusCode::UNAUTHORIZED, e.to_string()))
        }
    }
}

/// POST /api/v1/auth/logout - destroy the session entirely
pub async fn logout(session: Session) -> Result<impl IntoResponse, (StatusCode, String)> {
    session.flush().await.map_err(session_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Stores the authenticated user and a fresh round in the session.
async fn establish_session(
    session: &Session,
    profile: &UserProfile,
) -> Result<(), (StatusCode, String)> {
    session
        .insert(
            SESSION_USER_KEY,
            SessionUser {
                user_id: profile.id,
                username: profile.username.clone(),
            },
        )
        .await
        .map_err(session_error)?;
    session
        .insert(SESSION_ROUND_KEY, RoundState::default())
        .await
        .map_err(session_error)?;
    Ok(())
}

pub(crate) fn session_error(e: tower_sessions::session::Error) -> (StatusCode, String) {
    tracing::error!("Session store error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Session store error".to_string(),
    )
}
