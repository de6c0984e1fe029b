//! Device repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::entities::DeviceEntity;

/// Repository for device-related database operations.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: SqlitePool,
}

impl DeviceRepository {
    /// Creates a new DeviceRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new device.
    ///
    /// Fails with a unique-constraint violation if the device id is already
    /// registered; callers surface that as a conflict.
    pub async fn insert_device(
        &self,
        device_id: &str,
        name: &str,
        phone_number: Option<&str>,
    ) -> Result<DeviceEntity, sqlx::Error> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO devices (device_id, name, phone_number, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(device_id)
        .bind(name)
        .bind(phone_number)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(DeviceEntity {
            device_id: device_id.to_string(),
            name: name.to_string(),
            phone_number: phone_number.map(|p| p.to_string()),
            created_at: now,
        })
    }

    /// Find a device by its opaque id.
    pub async fn find_by_device_id(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT device_id, name, phone_number, created_at
            FROM devices
            WHERE device_id = ?
            "#,
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List all registered devices, newest first.
    pub async fn list_devices(&self) -> Result<Vec<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT device_id, name, phone_number, created_at
            FROM devices
            ORDER BY created_at DESC, device_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Delete a device record.
    ///
    /// Returns the number of rows affected (0 if the device did not exist).
    /// Cascading removal of the device's samples is composed by the caller,
    /// which deletes samples before calling this.
    pub async fn delete_device(&self, device_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM devices WHERE device_id = ?")
            .bind(device_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
