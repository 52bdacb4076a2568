use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use geoquiz_api::{config::Config, create_router, services::AppState};

pub const TEST_ACCESS_CODE: &str = "PROJETG52025!";
pub const TEST_PASSWORD: &str = "terrain-fissure-7";

pub async fn create_test_app() -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    // Load test environment from .env.test
    dotenvy::from_filename(".env.test").ok();

    let mut config = Config::load().expect("Failed to load test configuration");
    // Each test app owns an isolated in-memory database.
    config.database_url = "sqlite::memory:".to_string();
    config.access_code = TEST_ACCESS_CODE.to_string();

    let app_state = Arc::new(
        AppState::new(config)
            .await
            .expect("Failed to initialize test app state"),
    );

    create_router(app_state)
}

/// Minimal client that carries the session cookie between requests, so a
/// test can walk through access gate, login and a whole quiz round.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    pub async fn spawn() -> Self {
        Self::new(create_test_app().await)
    }

    async fn request(&mut self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_string(&value).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let raw = set_cookie.to_str().unwrap();
            // Keep only the `name=value` pair.
            self.cookie = Some(raw.split(';').next().unwrap().to_string());
        }

        response
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        self.request("GET", uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> Response {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn grant_access(&mut self) {
        let response = self
            .post("/api/v1/access", json!({ "code": TEST_ACCESS_CODE }))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    pub async fn register(&mut self, username: &str) {
        let response = self
            .post(
                "/api/v1/auth/register",
                json!({ "username": username, "password": TEST_PASSWORD }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect without Location header")
        .to_str()
        .unwrap()
}
