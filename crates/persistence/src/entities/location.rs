//! Location sample entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the locations table.
#[derive(Debug, Clone, FromRow)]
pub struct LocationEntity {
    pub id: i64,
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub heading: Option<f64>,
    pub battery_level: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

impl From<LocationEntity> for domain::models::LocationSample {
    fn from(entity: LocationEntity) -> Self {
        Self {
            sample_id: entity.id,
            device_id: entity.device_id,
            latitude: entity.latitude,
            longitude: entity.longitude,
            speed: entity.speed,
            accuracy: entity.accuracy,
            altitude: entity.altitude,
            heading: entity.heading,
            battery_level: entity.battery_level,
            timestamp: entity.timestamp,
        }
    }
}

/// A location row joined with the device's display name.
#[derive(Debug, Clone, FromRow)]
pub struct LatestLocationEntity {
    pub id: i64,
    pub device_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub heading: Option<f64>,
    pub battery_level: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

impl From<LatestLocationEntity> for domain::models::location::LatestLocation {
    fn from(entity: LatestLocationEntity) -> Self {
        Self {
            sample_id: entity.id,
            device_id: entity.device_id,
            name: entity.name,
            latitude: entity.latitude,
            longitude: entity.longitude,
            speed: entity.speed,
            accuracy: entity.accuracy,
            altitude: entity.altitude,
            heading: entity.heading,
            battery_level: entity.battery_level,
            timestamp: entity.timestamp,
        }
    }
}

/// A location row joined with the device's name and contact number, used by
/// the fleet-wide latest snapshot.
#[derive(Debug, Clone, FromRow)]
pub struct FleetLocationEntity {
    pub id: i64,
    pub device_id: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub heading: Option<f64>,
    pub battery_level: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

impl From<FleetLocationEntity> for domain::models::location::FleetLocation {
    fn from(entity: FleetLocationEntity) -> Self {
        Self {
            sample_id: entity.id,
            device_id: entity.device_id,
            name: entity.name,
            phone_number: entity.phone_number,
            latitude: entity.latitude,
            longitude: entity.longitude,
            speed: entity.speed,
            accuracy: entity.accuracy,
            altitude: entity.altitude,
            heading: entity.heading,
            battery_level: entity.battery_level,
            timestamp: entity.timestamp,
        }
    }
}
