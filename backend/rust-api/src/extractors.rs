use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::user::SessionUser;

/// Session key for the authenticated user.
pub const SESSION_USER_KEY: &str = "user";
/// Session key for the round in progress.
pub const SESSION_ROUND_KEY: &str = "round";

/// Custom JSON extractor that returns JSON error responses instead of HTML
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                let message = format!("Failed to parse JSON request body: {}", rejection);
                tracing::warn!("{}", message);
                let error_response = json!({
                    "message": message,
                    "status": 400
                });
                Err((StatusCode::BAD_REQUEST, Json(error_response)).into_response())
            }
        }
    }
}

/// The authenticated user taken from the cookie-backed session. Requests
/// without one are redirected to the login endpoint.
pub struct CurrentUser(pub SessionUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|rejection| rejection.into_response())?;

        let user = session
            .get::<SessionUser>(SESSION_USER_KEY)
            .await
            .map_err(|e| {
                tracing::error!("Failed to read session: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Session store error").into_response()
            })?;

        match user {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(Redirect::to("/api/v1/auth/login").into_response()),
        }
    }
}
