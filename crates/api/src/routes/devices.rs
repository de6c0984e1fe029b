//! Device endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use persistence::repositories::{DeviceRepository, LocationRepository};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_device_registered;
use domain::models::device::{ListDevicesResponse, RegisterDeviceRequest, RegisterDeviceResponse};

/// Register a new device.
///
/// POST /api/v1/devices/register
pub async fn register_device(
    State(state): State<AppState>,
    Json(request): Json<RegisterDeviceRequest>,
) -> Result<Json<RegisterDeviceResponse>, ApiError> {
    request.validate()?;

    let repo = DeviceRepository::new(state.pool.clone());
    let device = repo
        .insert_device(
            &request.device_id,
            &request.name,
            request.phone_number.as_deref(),
        )
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::Conflict("Device already registered".to_string()),
            other => other,
        })?;

    record_device_registered();
    info!(device_id = %device.device_id, name = %device.name, "Device registered");

    Ok(Json(domain::models::Device::from(device).into()))
}

/// List all registered devices, newest first.
///
/// GET /api/v1/devices
pub async fn list_devices(
    State(state): State<AppState>,
) -> Result<Json<ListDevicesResponse>, ApiError> {
    let repo = DeviceRepository::new(state.pool.clone());
    let devices = repo
        .list_devices()
        .await?
        .into_iter()
        .map(domain::models::Device::from)
        .collect();

    Ok(Json(ListDevicesResponse { devices }))
}

/// Response for device deletion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDeviceResponse {
    pub success: bool,
    pub message: String,
}

/// Delete a device and its location history.
///
/// DELETE /api/v1/devices/:device_id
///
/// Samples are removed before the device record so a concurrent submit can
/// never append for a device whose record is already gone. A submit that
/// passed its existence check just before this ran may still land one late
/// sample; that window is accepted behavior.
pub async fn delete_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<DeleteDeviceResponse>, ApiError> {
    let locations = LocationRepository::new(state.pool.clone());
    let devices = DeviceRepository::new(state.pool.clone());

    let samples_removed = locations.delete_by_device(&device_id).await?;
    let removed = devices.delete_device(&device_id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound("Device not found".to_string()));
    }

    info!(
        device_id = %device_id,
        samples_removed = samples_removed,
        "Device deleted"
    );

    Ok(Json(DeleteDeviceResponse {
        success: true,
        message: "Device deleted".to_string(),
    }))
}
