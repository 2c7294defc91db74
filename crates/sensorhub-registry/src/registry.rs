//! In-memory catalog of validated sensors.

use crate::builder::SensorBuilder;
use crate::config::RegistryConfig;
use crate::conflict::check_conflicts;
use crate::error::{ReadError, RegistryError, Result, ValidationStage};
use crate::record::SensorRecord;
use crate::schema::{self, BASE_SCHEMA, ConfigObject, Schema, SchemaViolation};
use sensorhub_core::SensorKind;
use sensorhub_hardware::{DriverProvider, NoDrivers, ReadingValue, SensorDriver};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Parse configuration text into a JSON object.
///
/// # Errors
///
/// Returns `RegistryError::Construction` for malformed JSON or a JSON value
/// that is not an object.
pub fn parse_config(raw_config: &str) -> Result<ConfigObject> {
    let value: Value = serde_json::from_str(raw_config)
        .map_err(|e| RegistryError::construction(format!("invalid JSON: {e}")))?;

    match value {
        Value::Object(config) => Ok(config),
        other => Err(RegistryError::construction(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

fn run_stage(stage: ValidationStage, schema: &Schema, config: &ConfigObject) -> Result<()> {
    let violations = schema::validate(schema, config);
    if violations.is_empty() {
        debug!("{} schema accepted configuration", schema.name);
        return Ok(());
    }

    for violation in &violations {
        warn!(schema = schema.name, "Configuration rejected: {}", violation);
    }
    Err(RegistryError::Schema { stage, violations })
}

/// Run the three validation stages and return the configured kind.
///
/// 1. base schema,
/// 2. the schema of the kind named by `sensor_type`,
/// 3. the unknown-field scan over both schemas.
///
/// The first failing stage ends validation.
pub fn validate_config(config: &ConfigObject) -> Result<SensorKind> {
    run_stage(ValidationStage::Base, &BASE_SCHEMA, config)?;

    let type_name = config
        .get("sensor_type")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let kind = SensorKind::from_config_name(type_name).map_err(|_| {
        warn!("Configuration rejected: unsupported sensor type '{}'", type_name);
        RegistryError::Schema {
            stage: ValidationStage::Device,
            violations: vec![SchemaViolation::UnsupportedKind {
                value: type_name.to_string(),
            }],
        }
    })?;

    let device_schema = Schema::for_kind(kind);
    run_stage(ValidationStage::Device, device_schema, config)?;

    let unknown = schema::unknown_fields(&[&BASE_SCHEMA, device_schema], config);
    if !unknown.is_empty() {
        warn!("Configuration rejected: unknown properties {:?}", unknown);
        return Err(RegistryError::UnknownFields { fields: unknown });
    }

    Ok(kind)
}

/// Ordered collection of validated sensors.
///
/// Sensors are kept in registration order. `add` is the only mutation and is
/// all-or-nothing: a rejected configuration leaves the registry unchanged.
///
/// The registry is single-owner; hosts sharing it between threads wrap the
/// whole registry in one lock.
///
/// # Examples
///
/// ```
/// use sensorhub_hardware::mock::MockDriverProvider;
/// use sensorhub_registry::{RegistryConfig, SensorRegistry};
///
/// let mut registry =
///     SensorRegistry::with_drivers(RegistryConfig::default(), MockDriverProvider::new());
///
/// registry.add(r#"{"sensor_type": "i2c", "bus_no": 2, "i2c_addr": 78,
///                  "dev_name": "BM280", "alias": "RHT-sensor1"}"#)?;
/// registry.add(r#"{"sensor_type": "uart", "bus_no": 4, "baud_rate": 115200,
///                  "dev_name": "CustomHygrometerSubmodule", "alias": "RHT-sensor3"}"#)?;
///
/// assert_eq!(registry.len(), 2);
/// assert!(registry.find_by_alias("RHT-sensor3").is_some());
///
/// for (alias, reading) in registry.iter_readings() {
///     println!("{alias}: {}", reading?);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SensorRegistry {
    sensors: Vec<SensorRecord>,
    config: RegistryConfig,
    drivers: Box<dyn DriverProvider>,
}

impl fmt::Debug for SensorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorRegistry")
            .field("sensors", &self.sensors)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl SensorRegistry {
    /// Create an empty registry whose sensors have no drivers.
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_drivers(config, NoDrivers)
    }

    /// Create an empty registry that asks `drivers` for each new sensor's driver.
    pub fn with_drivers(config: RegistryConfig, drivers: impl DriverProvider + 'static) -> Self {
        Self {
            sensors: Vec::new(),
            config,
            drivers: Box::new(drivers),
        }
    }

    /// Validate, build and register one sensor.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step: parsing
    /// (`Construction`), schema stages (`Schema`), the unknown-field scan
    /// (`UnknownFields`), building (`Build`), the conflict rules
    /// (`Conflict`) or driver initialization (`Initialization`).
    pub fn add(&mut self, raw_config: &str) -> Result<()> {
        let config = parse_config(raw_config)?;
        self.add_config(&config, None)
    }

    /// Like [`add`](Self::add), but the sensor gets `identifier` whatever
    /// the configuration says. Used when restoring stored sensors.
    pub fn add_with_identifier(&mut self, raw_config: &str, identifier: Uuid) -> Result<()> {
        let config = parse_config(raw_config)?;
        self.add_config(&config, Some(identifier))
    }

    fn add_config(&mut self, config: &ConfigObject, identifier: Option<Uuid>) -> Result<()> {
        let kind = validate_config(config)?;

        let mut record = SensorBuilder::new(kind).with_fields(config)?.finalize()?;

        if let Some(identifier) = identifier {
            record.set_identifier(identifier);
        } else if record.identifier().is_none() && self.config.assign_identifiers {
            record.set_identifier(Uuid::new_v4());
        }

        if let Err(conflict) = check_conflicts(&record, &self.sensors, &self.config) {
            warn!("Cannot add sensor '{}': {}", record.alias(), conflict);
            return Err(conflict.into());
        }

        self.bind_driver(&mut record)?;

        info!("Registered {}", record);
        self.sensors.push(record);
        Ok(())
    }

    fn bind_driver(&self, record: &mut SensorRecord) -> Result<()> {
        let Some(mut driver) = self.drivers.driver_for(record.kind()) else {
            debug!("No driver for sensor '{}'", record.alias());
            return Ok(());
        };

        let bus_no = record.base().bus_no;
        let selector = record.device().selector();
        match driver.configure(bus_no, selector) {
            Ok(()) => debug!("Sensor '{}' configured ({})", record.alias(), selector),
            Err(e) if e.is_unsupported() => {
                debug!(
                    "No configuration/initialization for sensor '{}', skipping",
                    record.alias()
                );
            }
            Err(source) => {
                warn!("Initialization of sensor '{}' failed: {}", record.alias(), source);
                return Err(RegistryError::Initialization {
                    alias: record.alias().to_string(),
                    source,
                });
            }
        }

        record.bind_driver(driver);
        Ok(())
    }

    /// One human-readable summary per sensor, in registration order.
    pub fn list(&self) -> Vec<String> {
        if self.sensors.is_empty() {
            info!("No sensors registered");
        }
        self.sensors
            .iter()
            .map(|record| {
                let summary = record.to_string();
                info!("{}", summary);
                summary
            })
            .collect()
    }

    /// Read every sensor once, in registration order.
    ///
    /// One entry per sensor. A sensor without a driver, or whose driver
    /// fails, yields an error entry; the other sensors are still read.
    pub fn read_all(&mut self) -> Vec<std::result::Result<ReadingValue, ReadError>> {
        self.iter_readings().map(|(_, reading)| reading).collect()
    }

    /// Lazily read every sensor, yielding `(alias, reading)` pairs.
    ///
    /// Each call starts a fresh pass over the current sensors.
    pub fn iter_readings(
        &mut self,
    ) -> impl Iterator<Item = (String, std::result::Result<ReadingValue, ReadError>)> + '_ {
        self.sensors.iter_mut().map(|record| {
            let alias = record.alias().to_string();
            let reading = record.read();
            match &reading {
                Ok(value) => debug!("Sensor '{}' value = {}", alias, value),
                Err(e) => warn!("{}", e),
            }
            (alias, reading)
        })
    }

    /// Sensors of `kind`, in registration order.
    pub fn find_by_kind(&self, kind: SensorKind) -> Vec<&SensorRecord> {
        self.sensors
            .iter()
            .filter(|record| record.kind() == kind)
            .collect()
    }

    /// First sensor registered under `alias`.
    pub fn find_by_alias(&self, alias: &str) -> Option<&SensorRecord> {
        self.sensors.iter().find(|record| record.alias() == alias)
    }

    /// First sensor registered with `identifier`.
    pub fn find_by_identifier(&self, identifier: &Uuid) -> Option<&SensorRecord> {
        self.sensors
            .iter()
            .find(|record| record.identifier().as_ref() == Some(identifier))
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// All sensors, in registration order.
    pub fn records(&self) -> &[SensorRecord] {
        &self.sensors
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("")]
    #[case("{\"sensor_type\": ")]
    #[case("[1, 2]")]
    #[case("\"i2c\"")]
    fn test_parse_config_rejects_non_objects(#[case] raw: &str) {
        assert!(matches!(
            parse_config(raw),
            Err(RegistryError::Construction(_))
        ));
    }

    #[test]
    fn test_validate_config_unsupported_kind() {
        let config = parse_config(
            r#"{"sensor_type": "can", "bus_no": 0, "dev_name": "x", "alias": "y"}"#,
        )
        .unwrap();

        match validate_config(&config).unwrap_err() {
            RegistryError::Schema { stage, violations } => {
                assert_eq!(stage, ValidationStage::Device);
                assert_eq!(
                    violations,
                    vec![SchemaViolation::UnsupportedKind {
                        value: "can".to_string()
                    }]
                );
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_validate_config_stage_order() {
        // Missing base field and an unknown field: base stage reports first
        let config = json!({"sensor_type": "i2c", "i2c_addr": 77, "clock_speed": 1,
                            "dev_name": "BM281", "alias": "sensor2E"});
        let err = validate_config(config.as_object().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Schema {
                stage: ValidationStage::Base,
                ..
            }
        ));
    }

    #[test]
    fn test_new_registry_is_empty_per_instance() {
        let mut first = SensorRegistry::default();
        let second = SensorRegistry::default();

        first
            .add(r#"{"sensor_type": "i2c", "bus_no": 2, "i2c_addr": 78, "dev_name": "BM280", "alias": "A"}"#)
            .unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_identifiers_assigned_unless_disabled() {
        let raw = r#"{"sensor_type": "spi", "bus_no": 1, "cs_no": 3, "dev_name": "SHT721", "alias": "A"}"#;

        let mut registry = SensorRegistry::default();
        registry.add(raw).unwrap();
        assert!(registry.records()[0].identifier().is_some());

        let mut registry = SensorRegistry::new(RegistryConfig::new().assign_identifiers(false));
        registry.add(raw).unwrap();
        assert!(registry.records()[0].identifier().is_none());
    }

    #[test]
    fn test_add_with_identifier_overrides() {
        let id = Uuid::from_u128(0xfeed);
        let mut registry = SensorRegistry::default();

        registry
            .add_with_identifier(
                r#"{"sensor_type": "uart", "bus_no": 4, "baud_rate": 9600, "dev_name": "H", "alias": "A", "uuid": 5}"#,
                id,
            )
            .unwrap();

        assert_eq!(registry.records()[0].identifier(), Some(id));
        assert!(registry.find_by_identifier(&id).is_some());
    }

    #[test]
    fn test_debug_omits_provider() {
        let registry = SensorRegistry::default();
        let debug = format!("{registry:?}");
        assert!(debug.starts_with("SensorRegistry"));
        assert!(debug.contains("sensors"));
    }
}
