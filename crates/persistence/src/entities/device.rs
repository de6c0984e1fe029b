//! Device entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub device_id: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DeviceEntity> for domain::models::Device {
    fn from(entity: DeviceEntity) -> Self {
        Self {
            device_id: entity.device_id,
            name: entity.name,
            phone_number: entity.phone_number,
            created_at: entity.created_at,
        }
    }
}
