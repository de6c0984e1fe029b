use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{devices, health, locations, updates};
use crate::services::UpdateBroadcaster;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub updates: UpdateBroadcaster,
}

pub fn create_app(config: Config, pool: SqlitePool) -> Router {
    let updates = UpdateBroadcaster::new(config.broadcast.channel_capacity);
    create_app_with_updates(config, pool, updates)
}

/// Build the application router with an externally-owned broadcaster.
///
/// Tests use this to subscribe to the update stream around requests.
pub fn create_app_with_updates(
    config: Config,
    pool: SqlitePool,
    updates: UpdateBroadcaster,
) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        updates,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // API routes (v1)
    let api_routes = Router::new()
        // Device registry
        .route("/api/v1/devices/register", post(devices::register_device))
        .route("/api/v1/devices", get(devices::list_devices))
        .route("/api/v1/devices/:device_id", delete(devices::delete_device))
        // Location ingestion and queries
        .route("/api/v1/locations", post(locations::submit_location))
        .route("/api/v1/locations/latest", get(locations::get_latest_all))
        .route(
            "/api/v1/devices/:device_id/locations",
            get(locations::get_history),
        )
        .route(
            "/api/v1/devices/:device_id/locations/latest",
            get(locations::get_latest),
        )
        // Real-time update stream
        .route("/api/v1/updates", get(updates::subscribe_updates));

    // Public operational routes
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
