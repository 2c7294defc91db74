//! Base (bus-generic) and device (bus-kind) sensor attributes.
//!
//! Every registered sensor owns one [`BaseAttributes`] and one
//! [`DeviceAttributes`] variant matching its kind. Device attributes are
//! created with the documented defaults and only the identifying field
//! (address, chip-select, baud rate) supplied.

use sensorhub_core::{DeviceSelector, SensorKind, constants::*};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

/// Replace an empty name with the [`UNNAMED`] placeholder.
pub(crate) fn normalize_name(name: String) -> String {
    if name.is_empty() {
        UNNAMED.to_string()
    } else {
        name
    }
}

/// Attributes shared by every externally bussed sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAttributes {
    pub kind: SensorKind,

    /// Bus (interface) number.
    pub bus_no: u8,

    /// Connected device, e.g. "BM280". Not unique.
    pub device_name: String,

    /// Sensor alias, intended to be unique.
    pub alias: String,

    pub identifier: Option<Uuid>,

    pub power_controlled: Option<bool>,
}

impl BaseAttributes {
    /// Create base attributes; empty names become `"none"`.
    pub fn new(
        kind: SensorKind,
        bus_no: u8,
        device_name: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            bus_no,
            device_name: normalize_name(device_name.into()),
            alias: normalize_name(alias.into()),
            identifier: None,
            power_controlled: None,
        }
    }

    pub fn with_identifier(mut self, identifier: Uuid) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn with_power_control(mut self, power_controlled: bool) -> Self {
        self.power_controlled = Some(power_controlled);
        self
    }
}

/// I2C device attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct I2cAttributes {
    /// 7-bit device address.
    pub address: u8,
    pub clock_speed: u32,
}

impl I2cAttributes {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            clock_speed: DEFAULT_CLOCK_SPEED,
        }
    }
}

/// SPI device attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiAttributes {
    pub chip_select: u8,
    pub mode: u8,
    pub data_bits: u8,
    pub clock_speed: u32,
    pub msb_first: bool,
    pub cs_toggle: bool,
    pub cycles_before: u32,
    pub cycles_after: u32,
}

impl SpiAttributes {
    pub fn new(chip_select: u8) -> Self {
        Self {
            chip_select,
            mode: DEFAULT_SPI_MODE,
            data_bits: DEFAULT_DATA_BITS,
            clock_speed: DEFAULT_CLOCK_SPEED,
            msb_first: DEFAULT_MSB_FIRST,
            cs_toggle: DEFAULT_CS_TOGGLE,
            cycles_before: DEFAULT_CYCLES,
            cycles_after: DEFAULT_CYCLES,
        }
    }
}

/// UART device attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UartAttributes {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: bool,
    pub stop_bits: u8,
}

impl UartAttributes {
    pub fn new(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: DEFAULT_DATA_BITS,
            parity: DEFAULT_PARITY,
            stop_bits: DEFAULT_STOP_BITS,
        }
    }
}

/// Device-specific attributes, one variant per [`SensorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DeviceAttributes {
    I2c(I2cAttributes),
    Spi(SpiAttributes),
    Uart(UartAttributes),
}

impl DeviceAttributes {
    /// Default attributes for `kind` with its identifying field set to `selector`.
    ///
    /// Returns `None` if the selector belongs to another kind.
    pub fn with_defaults(kind: SensorKind, selector: DeviceSelector) -> Option<Self> {
        match (kind, selector) {
            (SensorKind::I2c, DeviceSelector::Address(address)) => {
                Some(Self::I2c(I2cAttributes::new(address)))
            }
            (SensorKind::Spi, DeviceSelector::ChipSelect(line)) => {
                Some(Self::Spi(SpiAttributes::new(line)))
            }
            (SensorKind::Uart, DeviceSelector::BaudRate(rate)) => {
                Some(Self::Uart(UartAttributes::new(rate)))
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> SensorKind {
        match self {
            Self::I2c(_) => SensorKind::I2c,
            Self::Spi(_) => SensorKind::Spi,
            Self::Uart(_) => SensorKind::Uart,
        }
    }

    /// The resource passed to the driver's `configure` call.
    pub fn selector(&self) -> DeviceSelector {
        match self {
            Self::I2c(attrs) => DeviceSelector::Address(attrs.address),
            Self::Spi(attrs) => DeviceSelector::ChipSelect(attrs.chip_select),
            Self::Uart(attrs) => DeviceSelector::BaudRate(attrs.baud_rate),
        }
    }

    /// Attribute values keyed by their configuration property names.
    pub fn properties(&self) -> Vec<(&'static str, Value)> {
        match self {
            Self::I2c(attrs) => vec![
                ("i2c_addr", json!(attrs.address)),
                ("clk_speed", json!(attrs.clock_speed)),
            ],
            Self::Spi(attrs) => vec![
                ("cs_no", json!(attrs.chip_select)),
                ("spi_mode", json!(attrs.mode)),
                ("data_bits", json!(attrs.data_bits)),
                ("clk_speed", json!(attrs.clock_speed)),
                ("msb_first", json!(attrs.msb_first)),
                ("cs_toggle", json!(attrs.cs_toggle)),
                ("cycles_before", json!(attrs.cycles_before)),
                ("cycles_after", json!(attrs.cycles_after)),
            ],
            Self::Uart(attrs) => vec![
                ("baud_rate", json!(attrs.baud_rate)),
                ("data_bits", json!(attrs.data_bits)),
                ("parity", json!(attrs.parity)),
                ("stop_bits", json!(attrs.stop_bits)),
            ],
        }
    }
}
