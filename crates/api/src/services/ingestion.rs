//! Location ingestion service.
//!
//! Gatekeeper for accepting one sample: structural checks, registry lookup,
//! store append, then real-time publish. The existence check and the append
//! are deliberately not one transaction; a device deleted between the two
//! can leave one late sample behind. That window is documented behavior,
//! matched by the cascade ordering in device deletion (samples first, then
//! the device record).

use chrono::{TimeZone, Utc};
use persistence::repositories::{DeviceRepository, LocationRepository, LocationSampleInput};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::services::broadcast::UpdateBroadcaster;
use domain::models::location::SubmitLocationRequest;
use domain::models::LocationSample;

/// Errors from submitting a location sample.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

/// Accepts location samples, coordinating the store with the broadcaster.
pub struct IngestionService {
    devices: DeviceRepository,
    locations: LocationRepository,
    updates: UpdateBroadcaster,
}

impl IngestionService {
    pub fn new(pool: SqlitePool, updates: UpdateBroadcaster) -> Self {
        Self {
            devices: DeviceRepository::new(pool.clone()),
            locations: LocationRepository::new(pool),
            updates,
        }
    }

    /// Validate and accept one sample.
    ///
    /// On success the sample has been persisted and published to all current
    /// observers, in that order. Publishing is fire-and-forget: observer
    /// failures never surface here.
    pub async fn submit(
        &self,
        request: SubmitLocationRequest,
    ) -> Result<LocationSample, IngestError> {
        // Structural presence checks only; coordinate ranges are accepted
        // as-is.
        let device_id = match request.device_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                return Err(IngestError::InvalidArgument(
                    "device_id is required".to_string(),
                ))
            }
        };
        let latitude = request
            .latitude
            .ok_or_else(|| IngestError::InvalidArgument("latitude is required".to_string()))?;
        let longitude = request
            .longitude
            .ok_or_else(|| IngestError::InvalidArgument("longitude is required".to_string()))?;

        // Registry lookup reflects current state; no caching.
        if self.devices.find_by_device_id(&device_id).await?.is_none() {
            return Err(IngestError::UnknownDevice(
                "Device not registered".to_string(),
            ));
        }

        // Server clock unless the device reported its own capture time.
        let timestamp = match request.timestamp {
            Some(millis) => Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
                IngestError::InvalidArgument(format!("Invalid timestamp: {}", millis))
            })?,
            None => Utc::now(),
        };

        let input = LocationSampleInput {
            device_id: device_id.clone(),
            latitude,
            longitude,
            speed: request.speed,
            accuracy: request.accuracy,
            altitude: request.altitude,
            heading: request.heading,
            battery_level: request.battery_level,
            timestamp,
        };
        let sample_id = self.locations.insert_sample(&input).await?;

        let sample = LocationSample {
            sample_id,
            device_id,
            latitude,
            longitude,
            speed: input.speed,
            accuracy: input.accuracy,
            altitude: input.altitude,
            heading: input.heading,
            battery_level: input.battery_level,
            timestamp,
        };

        self.updates.publish(sample.clone());

        info!(
            device_id = %sample.device_id,
            sample_id = sample.sample_id,
            latitude = sample.latitude,
            longitude = sample.longitude,
            "Location sample accepted"
        );

        Ok(sample)
    }
}

impl From<IngestError> for crate::error::ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::InvalidArgument(msg) => crate::error::ApiError::InvalidArgument(msg),
            IngestError::UnknownDevice(msg) => crate::error::ApiError::UnknownDevice(msg),
            IngestError::Store(e) => e.into(),
        }
    }
}
