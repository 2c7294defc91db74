//! Builder that routes configuration fields into sensor attributes.
//!
//! Each field name is looked up in a static per-kind [`FieldMap`] derived
//! once from the schemas: base-schema names go to [`BaseAttributes`],
//! device-schema names to the kind's [`DeviceAttributes`]. A name found in
//! neither is kept as an extension field of the record and a warning is
//! logged. The registry runs the unknown-field scan first, so this only
//! happens when the builder is used directly.
//!
//! # Examples
//!
//! ```
//! use sensorhub_core::SensorKind;
//! use sensorhub_registry::builder::SensorBuilder;
//! use serde_json::json;
//!
//! let record = SensorBuilder::new(SensorKind::Spi)
//!     .with_field("bus_no", &json!(1))?
//!     .with_field("cs_no", &json!(3))?
//!     .with_field("clk_speed", &json!(5_000_000))?
//!     .with_field("dev_name", &json!("MPU6050"))?
//!     .with_field("alias", &json!("IMU-A1"))?
//!     .finalize()?;
//!
//! assert_eq!(record.alias(), "IMU-A1");
//! # Ok::<(), sensorhub_registry::builder::BuildError>(())
//! ```

use crate::attributes::{
    BaseAttributes, DeviceAttributes, I2cAttributes, SpiAttributes, UartAttributes,
};
use crate::record::SensorRecord;
use crate::schema::{BASE_SCHEMA, ConfigObject, Schema};
use sensorhub_core::{DeviceSelector, SensorKind};
use serde_json::Value;
use std::any::type_name;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Errors raised while building a sensor record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("Missing required field {field}")]
    MissingField { field: &'static str },

    #[error("Field {field} has invalid value {value} (expected {expected})")]
    InvalidValue {
        field: String,
        expected: &'static str,
        value: Value,
    },

    #[error("sensor_type '{found}' does not match {expected} builder")]
    KindMismatch { expected: SensorKind, found: String },

    #[error(transparent)]
    Core(#[from] sensorhub_core::Error),
}

impl BuildError {
    pub fn invalid_value(field: impl Into<String>, expected: &'static str, value: &Value) -> Self {
        Self::InvalidValue {
            field: field.into(),
            expected,
            value: value.clone(),
        }
    }
}

type BuildResult<T> = std::result::Result<T, BuildError>;

/// Attribute scope a field is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScope {
    Base,
    Device,
}

/// Static field-name to scope mapping for one sensor kind.
#[derive(Debug)]
pub struct FieldMap {
    kind: SensorKind,
    scopes: HashMap<&'static str, FieldScope>,
}

static I2C_FIELDS: LazyLock<FieldMap> = LazyLock::new(|| FieldMap::build(SensorKind::I2c));
static SPI_FIELDS: LazyLock<FieldMap> = LazyLock::new(|| FieldMap::build(SensorKind::Spi));
static UART_FIELDS: LazyLock<FieldMap> = LazyLock::new(|| FieldMap::build(SensorKind::Uart));

impl FieldMap {
    fn build(kind: SensorKind) -> Self {
        let device = Schema::for_kind(kind)
            .properties
            .iter()
            .map(|def| (def.name, FieldScope::Device));
        // Base entries come last so they win on a shared name
        let base = BASE_SCHEMA
            .properties
            .iter()
            .map(|def| (def.name, FieldScope::Base));

        Self {
            kind,
            scopes: device.chain(base).collect(),
        }
    }

    /// The map for `kind`, built on first use.
    pub fn for_kind(kind: SensorKind) -> &'static FieldMap {
        match kind {
            SensorKind::I2c => &*I2C_FIELDS,
            SensorKind::Spi => &*SPI_FIELDS,
            SensorKind::Uart => &*UART_FIELDS,
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn scope_of(&self, name: &str) -> Option<FieldScope> {
        self.scopes.get(name).copied()
    }
}

/// Configuration field that selects the device on its bus.
pub fn identifying_field(kind: SensorKind) -> &'static str {
    match kind {
        SensorKind::I2c => "i2c_addr",
        SensorKind::Spi => "cs_no",
        SensorKind::Uart => "baud_rate",
    }
}

fn integer<T: TryFrom<u64>>(field: &str, value: &Value) -> BuildResult<T> {
    value
        .as_u64()
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| BuildError::invalid_value(field, type_name::<T>(), value))
}

fn string(field: &str, value: &Value) -> BuildResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| BuildError::invalid_value(field, "string", value))
}

fn boolean(field: &str, value: &Value) -> BuildResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| BuildError::invalid_value(field, "boolean", value))
}

#[derive(Debug, Clone, Default)]
struct BaseDraft {
    bus_no: Option<u8>,
    device_name: Option<String>,
    alias: Option<String>,
    identifier: Option<Uuid>,
    power_controlled: Option<bool>,
}

/// Builder for a [`SensorRecord`] of one kind.
///
/// Fields are applied one at a time and each application sees the effect of
/// the previous ones; applying a field twice keeps the last value.
/// `finalize` consumes the builder.
#[derive(Debug, Clone)]
pub struct SensorBuilder {
    kind: SensorKind,
    base: BaseDraft,
    device: DeviceAttributes,
    selector_set: bool,
    extensions: BTreeMap<String, Value>,
}

impl SensorBuilder {
    /// Start a sensor of `kind` with default device attributes.
    pub fn new(kind: SensorKind) -> Self {
        let device = match kind {
            SensorKind::I2c => DeviceAttributes::I2c(I2cAttributes::new(0)),
            SensorKind::Spi => DeviceAttributes::Spi(SpiAttributes::new(0)),
            SensorKind::Uart => DeviceAttributes::Uart(UartAttributes::new(0)),
        };

        Self {
            kind,
            base: BaseDraft::default(),
            device,
            selector_set: false,
            extensions: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Apply one field.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::InvalidValue` if the value cannot be converted to
    /// the attribute's type, `BuildError::Core` if it is outside the bus
    /// limits, and `BuildError::KindMismatch` if `sensor_type` names another
    /// kind.
    pub fn with_field(mut self, name: &str, value: &Value) -> BuildResult<Self> {
        match FieldMap::for_kind(self.kind).scope_of(name) {
            Some(FieldScope::Base) => self.apply_base(name, value)?,
            Some(FieldScope::Device) => self.apply_device(name, value)?,
            None => self.add_extension(name, value),
        }
        Ok(self)
    }

    /// Apply every field of `config`, in key order.
    pub fn with_fields(self, config: &ConfigObject) -> BuildResult<Self> {
        config
            .iter()
            .try_fold(self, |builder, (name, value)| builder.with_field(name, value))
    }

    fn add_extension(&mut self, name: &str, value: &Value) {
        warn!(
            "Field '{}' is not an attribute of {} sensors, keeping it as an extension",
            name, self.kind
        );
        self.extensions.insert(name.to_string(), value.clone());
    }

    fn apply_base(&mut self, name: &str, value: &Value) -> BuildResult<()> {
        match name {
            "sensor_type" => {
                let found = string(name, value)?;
                if found != self.kind.as_str() {
                    return Err(BuildError::KindMismatch {
                        expected: self.kind,
                        found,
                    });
                }
            }
            "bus_no" => self.base.bus_no = Some(integer(name, value)?),
            "dev_name" => self.base.device_name = Some(string(name, value)?),
            "alias" => self.base.alias = Some(string(name, value)?),
            "uuid" => {
                let raw: u64 = integer(name, value)?;
                self.base.identifier = Some(Uuid::from_u128(u128::from(raw)));
            }
            "pwr_control" => self.base.power_controlled = Some(boolean(name, value)?),
            _ => self.add_extension(name, value),
        }
        Ok(())
    }

    fn apply_device(&mut self, name: &str, value: &Value) -> BuildResult<()> {
        match (&mut self.device, name) {
            (DeviceAttributes::I2c(attrs), "i2c_addr") => {
                let address = integer(name, value)?;
                DeviceSelector::i2c_address(address)?;
                attrs.address = address;
                self.selector_set = true;
            }
            (DeviceAttributes::I2c(attrs), "clk_speed") => {
                attrs.clock_speed = integer(name, value)?;
            }
            (DeviceAttributes::Spi(attrs), "cs_no") => {
                let line = integer(name, value)?;
                DeviceSelector::chip_select(line)?;
                attrs.chip_select = line;
                self.selector_set = true;
            }
            (DeviceAttributes::Spi(attrs), "spi_mode") => attrs.mode = integer(name, value)?,
            (DeviceAttributes::Spi(attrs), "data_bits") => {
                attrs.data_bits = integer(name, value)?;
            }
            (DeviceAttributes::Spi(attrs), "clk_speed") => {
                attrs.clock_speed = integer(name, value)?;
            }
            (DeviceAttributes::Spi(attrs), "msb_first") => attrs.msb_first = boolean(name, value)?,
            (DeviceAttributes::Spi(attrs), "cs_toggle") => attrs.cs_toggle = boolean(name, value)?,
            (DeviceAttributes::Spi(attrs), "cycles_before") => {
                attrs.cycles_before = integer(name, value)?;
            }
            (DeviceAttributes::Spi(attrs), "cycles_after") => {
                attrs.cycles_after = integer(name, value)?;
            }
            (DeviceAttributes::Uart(attrs), "baud_rate") => {
                let rate = integer(name, value)?;
                DeviceSelector::baud_rate(rate)?;
                attrs.baud_rate = rate;
                self.selector_set = true;
            }
            (DeviceAttributes::Uart(attrs), "data_bits") => {
                attrs.data_bits = integer(name, value)?;
            }
            (DeviceAttributes::Uart(attrs), "parity") => attrs.parity = boolean(name, value)?,
            (DeviceAttributes::Uart(attrs), "stop_bits") => {
                attrs.stop_bits = integer(name, value)?;
            }
            _ => self.add_extension(name, value),
        }
        Ok(())
    }

    /// Produce the record.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::MissingField` if `bus_no`, `dev_name`, `alias`
    /// or the kind's identifying field was never applied.
    pub fn finalize(self) -> BuildResult<SensorRecord> {
        let missing = |field| BuildError::MissingField { field };

        let bus_no = self.base.bus_no.ok_or_else(|| missing("bus_no"))?;
        let device_name = self.base.device_name.ok_or_else(|| missing("dev_name"))?;
        let alias = self.base.alias.ok_or_else(|| missing("alias"))?;
        if !self.selector_set {
            return Err(missing(identifying_field(self.kind)));
        }

        let mut base = BaseAttributes::new(self.kind, bus_no, device_name, alias);
        base.identifier = self.base.identifier;
        base.power_controlled = self.base.power_controlled;

        let record = SensorRecord::new(base, self.device).ok_or_else(|| BuildError::KindMismatch {
            expected: self.kind,
            found: self.device.kind().as_str().to_string(),
        })?;
        Ok(record.with_extensions(self.extensions))
    }
}
