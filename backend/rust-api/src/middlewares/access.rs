use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

/// Session flag set once the shared access code has been presented.
pub const SESSION_ACCESS_KEY: &str = "access_granted";

/// Routes reachable without the access code.
const OPEN_PATHS: &[&str] = &["/health", "/metrics", "/api/v1/access"];

/// Gates the whole API behind a shared access code: until the code has
/// been presented, every other route 303s back to the access endpoint.
pub async fn access_gate_middleware(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = request.uri().path();
    if OPEN_PATHS.contains(&path) {
        return Ok(next.run(request).await);
    }

    let granted = session
        .get::<bool>(SESSION_ACCESS_KEY)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read session: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .unwrap_or(false);

    if !granted {
        tracing::debug!(path = %path, "Access code not yet presented");
        return Ok(Redirect::to("/api/v1/access").into_response());
    }

    Ok(next.run(request).await)
}
