use crate::error::{StorageError, StorageResult};
use chrono::{DateTime, Utc};
use sensorhub_core::SensorKind;
use sensorhub_registry::SensorRecord;
use sensorhub_registry::schema::ConfigObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A sensor row from the `sensors` table.
///
/// The lookup columns (`sensor_type`, `bus_no`, `dev_name`, `alias`) are
/// copies of values inside `config`, which is the authoritative description
/// replayed through the registry on restore.
///
/// # Fields
///
/// * `id` - Auto-increment primary key, in storage order
/// * `sensor_type` - Configuration name of the kind (`"i2c"`, `"spi"`, `"uart"`)
/// * `uuid` - Identifier as 16 little-endian bytes, if the sensor has one
/// * `config` - JSON configuration regenerated from the record
/// * `created_at` - Time the row was stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredSensor {
    pub id: i64,
    pub sensor_type: String,
    pub bus_no: i64,
    pub dev_name: String,
    pub alias: String,
    pub uuid: Option<Vec<u8>>,
    pub config: String,
    pub created_at: DateTime<Utc>,
}

impl StoredSensor {
    /// Kind named by the `sensor_type` column.
    pub fn kind(&self) -> StorageResult<SensorKind> {
        SensorKind::from_config_name(&self.sensor_type).map_err(|e| {
            StorageError::Internal(format!("sensor row {} has {}", self.id, e))
        })
    }

    /// Decode the identifier blob.
    ///
    /// Returns `Ok(None)` for a sensor stored without an identifier.
    pub fn identifier(&self) -> StorageResult<Option<Uuid>> {
        self.uuid
            .as_deref()
            .map(|bytes| {
                Uuid::from_slice_le(bytes).map_err(|e| {
                    StorageError::Internal(format!("sensor row {} has a bad identifier: {}", self.id, e))
                })
            })
            .transpose()
    }

    /// Parse the stored JSON configuration.
    pub fn to_config(&self) -> StorageResult<ConfigObject> {
        match serde_json::from_str(&self.config)? {
            Value::Object(config) => Ok(config),
            other => Err(StorageError::Internal(format!(
                "sensor row {} holds a non-object configuration: {}",
                self.id, other
            ))),
        }
    }
}

/// Column values for inserting a sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSensor {
    pub sensor_type: &'static str,
    pub bus_no: i64,
    pub dev_name: String,
    pub alias: String,
    pub uuid: Option<Vec<u8>>,
    pub config: String,
}

impl NewSensor {
    /// Row values for `record`.
    ///
    /// Drivers and absent optional attributes are not stored.
    pub fn from_record(record: &SensorRecord) -> StorageResult<Self> {
        let base = record.base();
        Ok(Self {
            sensor_type: record.kind().as_str(),
            bus_no: i64::from(base.bus_no),
            dev_name: base.device_name.clone(),
            alias: base.alias.clone(),
            uuid: base.identifier.map(|id| id.to_bytes_le().to_vec()),
            config: serde_json::to_string(&record.to_config())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sensorhub_registry::SensorRegistry;

    fn stored(config: &str, uuid: Option<Vec<u8>>) -> StoredSensor {
        StoredSensor {
            id: 1,
            sensor_type: "spi".to_string(),
            bus_no: 1,
            dev_name: "SHT721".to_string(),
            alias: "RHT-sensor2A".to_string(),
            uuid,
            config: config.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_sensor_from_record() {
        let mut registry = SensorRegistry::default();
        registry
            .add(r#"{"sensor_type": "spi", "bus_no": 1, "cs_no": 3, "dev_name": "SHT721", "alias": "RHT-sensor2A"}"#)
            .unwrap();
        let record = &registry.records()[0];

        let row = NewSensor::from_record(record).unwrap();

        assert_eq!(row.sensor_type, "spi");
        assert_eq!(row.bus_no, 1);
        assert_eq!(row.alias, "RHT-sensor2A");
        assert_eq!(row.uuid.as_ref().map(Vec::len), Some(16));

        let config: Value = serde_json::from_str(&row.config).unwrap();
        assert_eq!(config["cs_no"], 3);
        assert_eq!(config["data_bits"], 8);
        assert!(config.get("pwr_control").is_none());
    }

    #[test]
    fn test_identifier_little_endian() {
        let id = Uuid::from_u128(0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10);
        let row = stored("{}", Some(id.to_bytes_le().to_vec()));

        assert_eq!(row.identifier().unwrap(), Some(id));
        assert_eq!(stored("{}", None).identifier().unwrap(), None);
    }

    #[test]
    fn test_bad_identifier_blob() {
        let row = stored("{}", Some(vec![1, 2, 3]));
        assert!(matches!(row.identifier(), Err(StorageError::Internal(_))));
    }

    #[rstest]
    #[case(r#"{"bus_no": 1}"#, None)]
    #[case("{}", None)]
    #[case("[1]", Some("internal"))]
    #[case(r#""spi""#, Some("internal"))]
    #[case("null", Some("internal"))]
    #[case("{", Some("serialization"))]
    fn test_to_config_requires_object(#[case] config: &str, #[case] failure: Option<&str>) {
        let result = stored(config, None).to_config();

        match (failure, result) {
            (None, Ok(_)) => {}
            (Some("internal"), Err(StorageError::Internal(_))) => {}
            (Some("serialization"), Err(StorageError::Serialization(_))) => {}
            (expected, other) => panic!("expected {expected:?} for {config}, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_column() {
        let mut row = stored("{}", None);
        row.sensor_type = "can".to_string();
        assert!(row.kind().is_err());
    }
}
