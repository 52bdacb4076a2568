use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;

pub use config::Config;
pub use services::AppState;

/// CSP middleware adds Content-Security-Policy header to all responses
async fn csp_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; \
             img-src 'self' data: https:; \
             connect-src 'self'",
        ),
    );
    response
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Cookie-backed server-side sessions; round state lives here.
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::hours(2)));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        // Public endpoints (no access code required)
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        // Access-code gate endpoint
        .route(
            "/api/v1/access",
            get(handlers::auth::access_prompt).post(handlers::auth::grant_access),
        )
        .nest("/api/v1/auth", auth_routes())
        .nest("/api/v1/quiz", quiz_routes())
        .route("/api/v1/profile", get(handlers::profile::profile))
        .route("/api/v1/leaderboard", get(handlers::profile::leaderboard))
        // Everything above except the public endpoints sits behind the gate
        .layer(middleware::from_fn(
            middlewares::access::access_gate_middleware,
        ))
        .layer(session_layer)
        .with_state(app_state)
        .layer(cors)
        .layer(middleware::from_fn(csp_middleware))
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
}

fn quiz_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::quiz::next_question))
        .route("/answer", post(handlers::quiz::submit_answer))
        .route("/victory", get(handlers::quiz::victory))
        .route("/lose", get(handlers::quiz::lose))
        .route("/retry", get(handlers::quiz::retry))
}
