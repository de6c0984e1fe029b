//! Location sample domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted observation of a device's position and telemetry.
///
/// `sample_id` is assigned by the store and is strictly increasing across
/// all devices; it is the authoritative recency order. `timestamp` is what
/// the device reported (or the server clock at acceptance) and is used only
/// for display ordering and range filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    pub sample_id: i64,
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

/// Request payload for submitting a single location sample.
///
/// `device_id`, `latitude` and `longitude` are required; the remaining
/// fields are optional telemetry. Presence is the only check performed on
/// coordinates; out-of-range values are accepted as-is.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLocationRequest {
    pub device_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed: Option<f64>,
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub heading: Option<f64>,
    pub battery_level: Option<i32>,
    /// Client timestamp in milliseconds since epoch. Defaults to the server
    /// clock at acceptance when absent.
    pub timestamp: Option<i64>,
}

/// Response payload for a successful location submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLocationResponse {
    pub success: bool,
    pub sample_id: i64,
}

/// Latest location for a single device, joined with its display name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestLocation {
    pub sample_id: i64,
    pub device_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

/// One entry in the fleet-wide latest snapshot: the most recent sample for a
/// device, joined with the device's name and contact number.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetLocation {
    pub sample_id: i64,
    pub device_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<i32>,
    pub timestamp: DateTime<Utc>,
}

/// Response payload for the fleet-wide latest snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetLocationsResponse {
    pub locations: Vec<FleetLocation>,
}

/// Query parameters for the location history endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLocationHistoryQuery {
    /// Maximum number of samples to return (default 100). Must be positive.
    pub limit: Option<i64>,

    /// Start timestamp filter (milliseconds since epoch), inclusive.
    pub from: Option<i64>,

    /// End timestamp filter (milliseconds since epoch), inclusive.
    pub to: Option<i64>,
}

impl GetLocationHistoryQuery {
    /// Default limit for history queries.
    pub const DEFAULT_LIMIT: i64 = 100;
    /// Upper clamp for history queries.
    pub const MAX_LIMIT: i64 = 1000;
}

/// Response payload for the location history endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationHistoryResponse {
    pub locations: Vec<LocationSample>,
}
