//! Location sample repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::entities::{FleetLocationEntity, LatestLocationEntity, LocationEntity};

/// Input for appending a single location sample.
#[derive(Debug, Clone)]
pub struct LocationSampleInput {
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

/// Parameters for a history query.
#[derive(Debug, Clone)]
pub struct LocationHistoryQuery {
    pub device_id: String,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: i64,
}

/// Repository for location-sample database operations.
#[derive(Clone)]
pub struct LocationRepository {
    pool: SqlitePool,
}

impl LocationRepository {
    /// Creates a new LocationRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a sample and return its store-assigned id.
    ///
    /// Ids come from the AUTOINCREMENT rowid, so they are unique and strictly
    /// increasing across all devices; assignment happens inside the insert,
    /// which SQLite serializes against concurrent writers.
    pub async fn insert_sample(&self, input: &LocationSampleInput) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO locations
                (device_id, latitude, longitude, speed, accuracy, altitude, heading, battery_level, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.device_id)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.speed)
        .bind(input.accuracy)
        .bind(input.altitude)
        .bind(input.heading)
        .bind(input.battery_level)
        .bind(input.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Latest sample for a device, joined with the device's display name.
    ///
    /// Recency is the store-assigned id, never the reported timestamp.
    pub async fn find_latest(
        &self,
        device_id: &str,
    ) -> Result<Option<LatestLocationEntity>, sqlx::Error> {
        sqlx::query_as::<_, LatestLocationEntity>(
            r#"
            SELECT l.id, l.device_id, d.name, l.latitude, l.longitude,
                   l.speed, l.accuracy, l.altitude, l.heading, l.battery_level, l.timestamp
            FROM locations l
            JOIN devices d ON d.device_id = l.device_id
            WHERE l.device_id = ?
            ORDER BY l.id DESC
            LIMIT 1
            "#,
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Latest sample for every device that has at least one, joined with the
    /// device's name and contact number.
    ///
    /// Selection is by max id per device; the result is ordered by reported
    /// timestamp descending for display, with device_id as a deterministic
    /// tie-breaker.
    pub async fn find_latest_all(&self) -> Result<Vec<FleetLocationEntity>, sqlx::Error> {
        sqlx::query_as::<_, FleetLocationEntity>(
            r#"
            SELECT l.id, l.device_id, d.name, d.phone_number, l.latitude, l.longitude,
                   l.speed, l.accuracy, l.altitude, l.heading, l.battery_level, l.timestamp
            FROM locations l
            JOIN devices d ON d.device_id = l.device_id
            WHERE l.id IN (
                SELECT MAX(id) FROM locations GROUP BY device_id
            )
            ORDER BY l.timestamp DESC, l.device_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Samples for a device within an optional timestamp range, newest first,
    /// truncated to the query's limit.
    pub async fn find_history(
        &self,
        query: &LocationHistoryQuery,
    ) -> Result<Vec<LocationEntity>, sqlx::Error> {
        sqlx::query_as::<_, LocationEntity>(
            r#"
            SELECT id, device_id, latitude, longitude,
                   speed, accuracy, altitude, heading, battery_level, timestamp
            FROM locations
            WHERE device_id = ?
              AND (? IS NULL OR timestamp >= ?)
              AND (? IS NULL OR timestamp <= ?)
            ORDER BY timestamp DESC
            LIMIT ?
            "#,
        )
        .bind(&query.device_id)
        .bind(query.from)
        .bind(query.from)
        .bind(query.to)
        .bind(query.to)
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Remove every sample for a device. Idempotent.
    pub async fn delete_by_device(&self, device_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE device_id = ?")
            .bind(device_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
