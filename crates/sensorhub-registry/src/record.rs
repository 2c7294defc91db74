//! The unit stored in the registry.

use crate::attributes::{BaseAttributes, DeviceAttributes};
use crate::error::ReadError;
use crate::schema::ConfigObject;
use sensorhub_core::SensorKind;
use sensorhub_hardware::{AnySensorDriver, DeviceInfo, HardwareError, ReadingValue, SensorDriver};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// A validated sensor: base attributes, device attributes of the same kind,
/// extension fields admitted by the builder, and an optional bound driver.
#[derive(Debug)]
pub struct SensorRecord {
    base: BaseAttributes,
    device: DeviceAttributes,
    extensions: BTreeMap<String, Value>,
    driver: Option<AnySensorDriver>,
}

impl SensorRecord {
    /// Create a record without a driver.
    ///
    /// Returns `None` if `base` and `device` disagree on the kind.
    pub fn new(base: BaseAttributes, device: DeviceAttributes) -> Option<Self> {
        if base.kind != device.kind() {
            return None;
        }
        Some(Self {
            base,
            device,
            extensions: BTreeMap::new(),
            driver: None,
        })
    }

    pub(crate) fn with_extensions(mut self, extensions: BTreeMap<String, Value>) -> Self {
        self.extensions = extensions;
        self
    }

    pub(crate) fn set_identifier(&mut self, identifier: Uuid) {
        self.base.identifier = Some(identifier);
    }

    pub(crate) fn bind_driver(&mut self, driver: AnySensorDriver) {
        self.driver = Some(driver);
    }

    pub fn base(&self) -> &BaseAttributes {
        &self.base
    }

    pub fn device(&self) -> &DeviceAttributes {
        &self.device
    }

    pub fn kind(&self) -> SensorKind {
        self.base.kind
    }

    pub fn alias(&self) -> &str {
        &self.base.alias
    }

    pub fn identifier(&self) -> Option<Uuid> {
        self.base.identifier
    }

    /// Fields outside both schemas that were admitted during construction.
    pub fn extensions(&self) -> &BTreeMap<String, Value> {
        &self.extensions
    }

    pub fn has_driver(&self) -> bool {
        self.driver.is_some()
    }

    /// Metadata of the bound driver, if any.
    pub fn driver_info(&self) -> Option<DeviceInfo> {
        self.driver.as_ref().map(SensorDriver::info)
    }

    /// Take one reading through the bound driver.
    ///
    /// # Errors
    ///
    /// A sensor without a driver reports `HardwareError::Unsupported`;
    /// a driver failure is passed through.
    pub fn read(&mut self) -> Result<ReadingValue, ReadError> {
        let result = match self.driver.as_mut() {
            Some(driver) => driver.read(),
            None => Err(HardwareError::unsupported("read")),
        };
        result.map_err(|source| ReadError {
            alias: self.base.alias.clone(),
            source,
        })
    }

    /// Regenerate a configuration object that describes this sensor.
    ///
    /// Every attribute is written out, defaults included. The identifier is
    /// omitted when it does not fit the range the base schema accepts.
    pub fn to_config(&self) -> ConfigObject {
        let mut config = ConfigObject::new();
        config.insert("sensor_type".into(), json!(self.base.kind.as_str()));
        config.insert("bus_no".into(), json!(self.base.bus_no));
        config.insert("dev_name".into(), json!(self.base.device_name));
        config.insert("alias".into(), json!(self.base.alias));
        if let Some(id) = self
            .base
            .identifier
            .and_then(|id| i64::try_from(id.as_u128()).ok())
        {
            config.insert("uuid".into(), json!(id));
        }
        if let Some(power) = self.base.power_controlled {
            config.insert("pwr_control".into(), json!(power));
        }
        for (name, value) in self.device.properties() {
            config.insert(name.into(), value);
        }
        config
    }
}

impl fmt::Display for SensorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sensor '{}' ({}) on bus {}:",
            self.base.kind, self.base.alias, self.base.device_name, self.base.bus_no
        )?;
        for (name, value) in self.device.properties() {
            write!(f, " {name}={value}")?;
        }
        for (name, value) in &self.extensions {
            write!(f, " {name}={value}")?;
        }
        if let Some(identifier) = self.base.identifier {
            write!(f, " uuid={identifier}")?;
        }
        Ok(())
    }
}
