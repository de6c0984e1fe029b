//! Device domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Represents a registered device in the system.
///
/// A device is created once at registration and never mutated; removal
/// cascades to the device's location samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for device registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceRequest {
    #[validate(length(
        min = 1,
        max = 128,
        message = "Device ID must be between 1 and 128 characters"
    ))]
    pub device_id: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,

    pub phone_number: Option<String>,
}

/// Response payload for device registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceResponse {
    pub device_id: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Device> for RegisterDeviceResponse {
    fn from(device: Device) -> Self {
        Self {
            device_id: device.device_id,
            name: device.name,
            phone_number: device.phone_number,
            created_at: device.created_at,
        }
    }
}

/// Response payload for device listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDevicesResponse {
    pub devices: Vec<Device>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_valid() {
        let request = RegisterDeviceRequest {
            device_id: "gps-1".to_string(),
            name: "Delivery Van".to_string(),
            phone_number: Some("+15551234567".to_string()),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn register_request_empty_device_id() {
        let request = RegisterDeviceRequest {
            device_id: String::new(),
            name: "Delivery Van".to_string(),
            phone_number: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn register_request_empty_name() {
        let request = RegisterDeviceRequest {
            device_id: "gps-1".to_string(),
            name: String::new(),
            phone_number: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn register_request_deserializes_camel_case() {
        let json = r#"{"deviceId": "gps-1", "name": "Van", "phoneNumber": "+1555"}"#;
        let request: RegisterDeviceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.device_id, "gps-1");
        assert_eq!(request.phone_number.as_deref(), Some("+1555"));
    }

    #[test]
    fn register_request_phone_optional() {
        let json = r#"{"deviceId": "gps-1", "name": "Van"}"#;
        let request: RegisterDeviceRequest = serde_json::from_str(json).unwrap();
        assert!(request.phone_number.is_none());
    }
}
