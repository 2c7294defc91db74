#![allow(async_fn_in_trait)]

use crate::error::{StorageError, StorageResult};
use crate::models::{NewSensor, StoredSensor};
use chrono::Utc;
use sensorhub_core::SensorKind;
use sensorhub_registry::SensorRecord;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

/// Repository trait for stored sensors.
///
/// Results come back in storage order, which is the order sensors must be
/// replayed in to rebuild a registry.
pub trait SensorRepository: Send + Sync {
    /// Store a registered sensor and return its row id
    async fn store(&self, record: &SensorRecord) -> StorageResult<i64>;

    /// Find all stored sensors of one kind
    async fn find_by_kind(&self, kind: SensorKind) -> StorageResult<Vec<StoredSensor>>;

    /// Find the first sensor stored under `alias`
    async fn find_by_alias(&self, alias: &str) -> StorageResult<Option<StoredSensor>>;

    /// Find the first sensor stored with `identifier`
    async fn find_by_identifier(&self, identifier: &Uuid) -> StorageResult<Option<StoredSensor>>;

    /// Load every stored sensor
    async fn load_all(&self) -> StorageResult<Vec<StoredSensor>>;

    /// Delete a stored sensor by row id
    async fn delete(&self, id: i64) -> StorageResult<()>;

    /// Number of stored sensors
    async fn count(&self) -> StorageResult<i64>;
}

/// SQLite implementation of SensorRepository
pub struct SqliteSensorRepository {
    pool: SqlitePool,
}

impl SqliteSensorRepository {
    /// Create a new SQLite sensor repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SensorRepository for SqliteSensorRepository {
    async fn store(&self, record: &SensorRecord) -> StorageResult<i64> {
        let row = NewSensor::from_record(record)?;

        let result = sqlx::query(
            r#"
            INSERT INTO sensors (
                sensor_type, bus_no, dev_name, alias, uuid, config, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.sensor_type)
        .bind(row.bus_no)
        .bind(&row.dev_name)
        .bind(&row.alias)
        .bind(&row.uuid)
        .bind(&row.config)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Stored sensor '{}' as row {}", row.alias, id);
        Ok(id)
    }

    async fn find_by_kind(&self, kind: SensorKind) -> StorageResult<Vec<StoredSensor>> {
        let sensors = sqlx::query_as::<_, StoredSensor>(
            r#"
            SELECT id, sensor_type, bus_no, dev_name, alias, uuid, config, created_at
            FROM sensors
            WHERE sensor_type = ?
            ORDER BY id
            "#,
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(sensors)
    }

    async fn find_by_alias(&self, alias: &str) -> StorageResult<Option<StoredSensor>> {
        let sensor = sqlx::query_as::<_, StoredSensor>(
            r#"
            SELECT id, sensor_type, bus_no, dev_name, alias, uuid, config, created_at
            FROM sensors
            WHERE alias = ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(alias)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sensor)
    }

    async fn find_by_identifier(&self, identifier: &Uuid) -> StorageResult<Option<StoredSensor>> {
        let sensor = sqlx::query_as::<_, StoredSensor>(
            r#"
            SELECT id, sensor_type, bus_no, dev_name, alias, uuid, config, created_at
            FROM sensors
            WHERE uuid = ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(identifier.to_bytes_le().to_vec())
        .fetch_optional(&self.pool)
        .await?;

        Ok(sensor)
    }

    async fn load_all(&self) -> StorageResult<Vec<StoredSensor>> {
        let sensors = sqlx::query_as::<_, StoredSensor>(
            r#"
            SELECT id, sensor_type, bus_no, dev_name, alias, uuid, config, created_at
            FROM sensors
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sensors)
    }

    async fn delete(&self, id: i64) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM sensors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound {
                entity_type: "Sensor".to_string(),
                field: "id".to_string(),
                value: id.to_string(),
            });
        }

        Ok(())
    }

    async fn count(&self) -> StorageResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sensors")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}
