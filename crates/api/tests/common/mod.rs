#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use fieldcrm_api::auth::jwt::{generate_access_token, JwtConfig};
use fieldcrm_api::config::ServerConfig;
use fieldcrm_api::router::build_app_router;
use fieldcrm_api::state::AppState;
use fieldcrm_db::models::user::CreateUser;
use fieldcrm_db::repositories::UserRepo;
use fieldcrm_events::{AttendanceEvent, EventBus};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "fieldcrm-test-secret";

/// Build a test `ServerConfig` with safe defaults and a known JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        default_utc_offset_minutes: 0,
    }
}

/// Build the full application router over `pool`, with the same middleware
/// stack production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_events(pool).0
}

/// Like [`build_test_app`], also returning a subscription to the event bus.
pub fn build_test_app_with_events(
    pool: PgPool,
) -> (Router, broadcast::Receiver<AttendanceEvent>) {
    let event_bus = Arc::new(EventBus::default());
    let receiver = event_bus.subscribe();
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        event_bus,
    };
    (build_app_router(state), receiver)
}

/// Insert a user and return its id.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: email.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            utc_offset_minutes: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// Mint a bearer token the test app accepts.
pub fn token_for(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a raw body with an optional `Content-Type`, for malformed requests.
pub async fn post_raw_auth(
    app: Router,
    uri: &str,
    token: &str,
    content_type: Option<&str>,
    body: &str,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"));
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A well-formed start/end body.
pub fn toggle_body(action: &str, address: &str) -> serde_json::Value {
    serde_json::json!({
        "action": action,
        "location": {
            "latitude": 19.076,
            "longitude": 72.8777,
            "address": address,
            "captureMethod": "gps",
        }
    })
}

/// A check-in body whose leg runs one degree north from the equator.
pub fn check_in_body(check_in_id: i64) -> serde_json::Value {
    serde_json::json!({
        "checkInId": check_in_id,
        "origin": { "latitude": 0.0, "longitude": 0.0 },
        "destination": { "latitude": 1.0, "longitude": 0.0 },
    })
}
