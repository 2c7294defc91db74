use crate::{
    Result,
    constants::{MAX_BAUD_RATE, MAX_CS_VAL, MAX_I2C_ADDR, MIN_BAUD_RATE, MIN_CS_VAL, MIN_I2C_ADDR},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bus family a sensor is attached to.
///
/// The kind selects the device-specific schema, the attribute set and the
/// resource-conflict rule applied when the sensor is registered. Adding a
/// kind is a compile-time exercise: every `match` over it must be extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    I2c,
    Spi,
    Uart,
}

impl SensorKind {
    /// All supported kinds, in declaration order.
    pub const ALL: [SensorKind; 3] = [SensorKind::I2c, SensorKind::Spi, SensorKind::Uart];

    /// Name used for this kind in configuration input (`"i2c"`, `"spi"`, `"uart"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SensorKind::I2c => "i2c",
            SensorKind::Spi => "spi",
            SensorKind::Uart => "uart",
        }
    }

    /// Parse a kind from its configuration name.
    ///
    /// Matching is exact: `"I2C"` is not accepted.
    ///
    /// # Errors
    /// Returns `Error::InvalidSensorKind` for any other string.
    pub fn from_config_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| Error::InvalidSensorKind(name.to_string()))
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SensorKind::I2c => write!(f, "I2C"),
            SensorKind::Spi => write!(f, "SPI"),
            SensorKind::Uart => write!(f, "UART"),
        }
    }
}

impl std::str::FromStr for SensorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SensorKind::from_config_name(s)
    }
}

/// The bus resource that singles out one device on its bus.
///
/// Passed to a driver's `configure` call together with the bus number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceSelector {
    /// 7-bit I2C address.
    Address(u8),
    /// SPI chip-select line.
    ChipSelect(u8),
    /// UART baud rate (one device per serial port).
    BaudRate(u32),
}

impl DeviceSelector {
    /// Create an I2C address selector.
    ///
    /// # Errors
    /// Returns `Error::OutOfRange` if the address is above 127.
    pub fn i2c_address(address: u8) -> Result<Self> {
        if !(MIN_I2C_ADDR..=MAX_I2C_ADDR).contains(&address) {
            return Err(Error::out_of_range(
                "i2c_addr",
                MIN_I2C_ADDR.into(),
                MAX_I2C_ADDR.into(),
                address.into(),
            ));
        }
        Ok(Self::Address(address))
    }

    /// Create an SPI chip-select selector.
    ///
    /// # Errors
    /// Returns `Error::OutOfRange` if the line is above 7.
    pub fn chip_select(line: u8) -> Result<Self> {
        if !(MIN_CS_VAL..=MAX_CS_VAL).contains(&line) {
            return Err(Error::out_of_range(
                "cs_no",
                MIN_CS_VAL.into(),
                MAX_CS_VAL.into(),
                line.into(),
            ));
        }
        Ok(Self::ChipSelect(line))
    }

    /// Create a UART baud-rate selector.
    ///
    /// # Errors
    /// Returns `Error::OutOfRange` if the rate is outside 2400-921400.
    pub fn baud_rate(rate: u32) -> Result<Self> {
        if !(MIN_BAUD_RATE..=MAX_BAUD_RATE).contains(&rate) {
            return Err(Error::out_of_range(
                "baud_rate",
                MIN_BAUD_RATE.into(),
                MAX_BAUD_RATE.into(),
                rate.into(),
            ));
        }
        Ok(Self::BaudRate(rate))
    }

    /// The bus kind this selector belongs to.
    #[must_use]
    pub fn kind(&self) -> SensorKind {
        match self {
            DeviceSelector::Address(_) => SensorKind::I2c,
            DeviceSelector::ChipSelect(_) => SensorKind::Spi,
            DeviceSelector::BaudRate(_) => SensorKind::Uart,
        }
    }
}

impl fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeviceSelector::Address(address) => write!(f, "address={address}"),
            DeviceSelector::ChipSelect(line) => write!(f, "CS={line}"),
            DeviceSelector::BaudRate(rate) => write!(f, "baud={rate}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("i2c", SensorKind::I2c)]
    #[case("spi", SensorKind::Spi)]
    #[case("uart", SensorKind::Uart)]
    fn test_sensor_kind_valid(#[case] input: &str, #[case] expected: SensorKind) {
        let kind: SensorKind = input.parse().unwrap();
        assert_eq!(kind, expected);
        assert_eq!(kind.as_str(), input);
    }

    #[rstest]
    #[case("I2C")] // case sensitive
    #[case("can")] // not supported
    #[case("")]
    fn test_sensor_kind_invalid(#[case] input: &str) {
        let result: Result<SensorKind> = input.parse();
        assert_eq!(result, Err(Error::InvalidSensorKind(input.to_string())));
    }

    #[test]
    fn test_sensor_kind_display() {
        assert_eq!(SensorKind::I2c.to_string(), "I2C");
        assert_eq!(SensorKind::Spi.to_string(), "SPI");
        assert_eq!(SensorKind::Uart.to_string(), "UART");
    }

    #[test]
    fn test_sensor_kind_serde_uses_config_names() {
        let json = serde_json::to_string(&SensorKind::Uart).unwrap();
        assert_eq!(json, "\"uart\"");
        let kind: SensorKind = serde_json::from_str("\"spi\"").unwrap();
        assert_eq!(kind, SensorKind::Spi);
    }

    #[rstest]
    #[case(0)]
    #[case(78)]
    #[case(127)]
    fn test_i2c_address_valid(#[case] address: u8) {
        let selector = DeviceSelector::i2c_address(address).unwrap();
        assert_eq!(selector, DeviceSelector::Address(address));
        assert_eq!(selector.kind(), SensorKind::I2c);
    }

    #[test]
    fn test_i2c_address_out_of_range() {
        let err = DeviceSelector::i2c_address(128).unwrap_err();
        assert_eq!(err.to_string(), "i2c_addr must be 0-127, got 128");
    }

    #[rstest]
    #[case(0, true)]
    #[case(7, true)]
    #[case(8, false)]
    fn test_chip_select_range(#[case] line: u8, #[case] valid: bool) {
        assert_eq!(DeviceSelector::chip_select(line).is_ok(), valid);
    }

    #[rstest]
    #[case(2_399, false)]
    #[case(2_400, true)]
    #[case(115_200, true)]
    #[case(921_400, true)]
    #[case(921_600, false)]
    fn test_baud_rate_range(#[case] rate: u32, #[case] valid: bool) {
        assert_eq!(DeviceSelector::baud_rate(rate).is_ok(), valid);
    }

    #[test]
    fn test_selector_display() {
        assert_eq!(DeviceSelector::Address(78).to_string(), "address=78");
        assert_eq!(DeviceSelector::ChipSelect(3).to_string(), "CS=3");
        assert_eq!(DeviceSelector::BaudRate(115_200).to_string(), "baud=115200");
    }
}
