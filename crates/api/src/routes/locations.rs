//! Location endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, TimeZone, Utc};
use persistence::repositories::{LocationHistoryQuery, LocationRepository};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_sample_ingested;
use crate::services::IngestionService;
use domain::models::location::{
    FleetLocationsResponse, GetLocationHistoryQuery, LatestLocation, LocationHistoryResponse,
    SubmitLocationRequest, SubmitLocationResponse,
};

/// Submit a single location sample.
///
/// POST /api/v1/locations
pub async fn submit_location(
    State(state): State<AppState>,
    Json(request): Json<SubmitLocationRequest>,
) -> Result<Json<SubmitLocationResponse>, ApiError> {
    let service = IngestionService::new(state.pool.clone(), state.updates.clone());
    let sample = service.submit(request).await?;

    record_sample_ingested();

    Ok(Json(SubmitLocationResponse {
        success: true,
        sample_id: sample.sample_id,
    }))
}

/// Latest location for a device, joined with its display name.
///
/// GET /api/v1/devices/:device_id/locations/latest
///
/// 404 here means the device has no samples yet; an unregistered device id
/// gives the same empty result, which the registry surface disambiguates.
pub async fn get_latest(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<LatestLocation>, ApiError> {
    let repo = LocationRepository::new(state.pool.clone());
    let entity = repo
        .find_latest(&device_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No location data found".to_string()))?;

    Ok(Json(entity.into()))
}

/// Latest location for every device that has reported at least once.
///
/// GET /api/v1/locations/latest
pub async fn get_latest_all(
    State(state): State<AppState>,
) -> Result<Json<FleetLocationsResponse>, ApiError> {
    let repo = LocationRepository::new(state.pool.clone());
    let locations = repo
        .find_latest_all()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(FleetLocationsResponse { locations }))
}

/// Location history for a device, newest first.
///
/// GET /api/v1/devices/:device_id/locations?limit&from&to
pub async fn get_history(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    Query(query): Query<GetLocationHistoryQuery>,
) -> Result<Json<LocationHistoryResponse>, ApiError> {
    let limit = query.limit.unwrap_or(GetLocationHistoryQuery::DEFAULT_LIMIT);
    if limit <= 0 {
        return Err(ApiError::InvalidArgument(
            "limit must be a positive integer".to_string(),
        ));
    }
    let limit = limit.min(GetLocationHistoryQuery::MAX_LIMIT);

    let from = parse_millis(query.from, "from")?;
    let to = parse_millis(query.to, "to")?;

    let repo = LocationRepository::new(state.pool.clone());
    let locations: Vec<_> = repo
        .find_history(&LocationHistoryQuery {
            device_id: device_id.clone(),
            from,
            to,
            limit,
        })
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    info!(
        device_id = %device_id,
        count = locations.len(),
        "Location history retrieved"
    );

    Ok(Json(LocationHistoryResponse { locations }))
}

/// Convert an optional millisecond timestamp bound to a DateTime.
fn parse_millis(millis: Option<i64>, field: &str) -> Result<Option<DateTime<Utc>>, ApiError> {
    match millis {
        Some(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .map(Some)
            .ok_or_else(|| ApiError::InvalidArgument(format!("Invalid '{}' timestamp: {}", field, ms))),
        None => Ok(None),
    }
}
