//! Common test utilities for integration tests.
//!
//! Tests run the full router against an in-memory SQLite pool, so no
//! external services are required.

// Helper utilities that not every integration test uses.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use fake::faker::name::en::Name;
use fake::Fake;
use geotrack_api::app::{create_app, create_app_with_updates};
use geotrack_api::config::Config;
use geotrack_api::services::UpdateBroadcaster;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Create an in-memory test database pool with the schema applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    persistence::db::MIGRATOR
        .run(&pool)
        .await
        .expect("migrations failed");
    pool
}

/// Test configuration built from embedded defaults.
pub fn test_config() -> Config {
    Config::load_for_test(&[]).expect("failed to load test config")
}

/// Build the application router for tests.
pub fn create_test_app(pool: SqlitePool) -> Router {
    create_app(test_config(), pool)
}

/// Build the application router with an externally-owned broadcaster, so a
/// test can subscribe to the update stream around requests.
pub fn create_test_app_with_updates(pool: SqlitePool, updates: UpdateBroadcaster) -> Router {
    create_app_with_updates(test_config(), pool, updates)
}

/// Build a JSON request.
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

/// Build a bodyless GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

/// Build a bodyless DELETE request.
pub fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

/// Parse a response body as JSON.
pub async fn parse_response_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not valid JSON")
}

/// Send one request through the router.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("request handling failed")
}

/// Register a device and return its id.
pub async fn register_device(app: &Router, device_id: &str) -> String {
    let name: String = Name().fake();
    let response = send(
        app,
        json_request(
            Method::POST,
            "/api/v1/devices/register",
            json!({ "deviceId": device_id, "name": name }),
        ),
    )
    .await;
    assert!(
        response.status().is_success(),
        "device registration failed: {}",
        response.status()
    );
    device_id.to_string()
}

/// Submit a location sample and return the response body.
pub async fn submit_location(app: &Router, device_id: &str, lat: f64, lon: f64) -> Value {
    let response = send(
        app,
        json_request(
            Method::POST,
            "/api/v1/locations",
            json!({ "deviceId": device_id, "latitude": lat, "longitude": lon }),
        ),
    )
    .await;
    assert!(
        response.status().is_success(),
        "location submit failed: {}",
        response.status()
    );
    parse_response_body(response).await
}
