//! Per-kind bus resource conflict rules.
//!
//! A candidate sensor is compared against every already registered sensor of
//! the same kind:
//!
//! - I2C: the address may be used once. By default this ignores the bus
//!   number; [`I2cConflictScope::PerBus`] limits the comparison to one bus.
//! - SPI: a chip-select line may be used once per bus.
//! - UART: a serial port (bus) holds one sensor, whatever its baud rate.

use crate::attributes::DeviceAttributes;
use crate::config::{I2cConflictScope, RegistryConfig};
use crate::record::SensorRecord;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// A resource the candidate sensor would share with a registered one.
///
/// `holder` is the alias of the registered sensor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusConflict {
    #[error("I2C address={address} already in use on bus#={bus_no} (by '{holder}')")]
    I2cAddress {
        address: u8,
        bus_no: u8,
        holder: String,
    },

    #[error("SPI CS={chip_select} already in use on bus#={bus_no} (by '{holder}')")]
    SpiChipSelect {
        bus_no: u8,
        chip_select: u8,
        holder: String,
    },

    #[error("UART serial port={bus_no} already in use (by '{holder}')")]
    UartPort { bus_no: u8, holder: String },

    #[error("alias '{alias}' already registered")]
    DuplicateAlias { alias: String },

    #[error("identifier {identifier} already registered (by '{holder}')")]
    DuplicateIdentifier { identifier: Uuid, holder: String },
}

/// Run the conflict rule of the candidate's kind, plus the alias and
/// identifier checks when `config.enforce_unique_keys` is set.
pub fn check_conflicts(
    candidate: &SensorRecord,
    registered: &[SensorRecord],
    config: &RegistryConfig,
) -> Result<(), BusConflict> {
    if config.enforce_unique_keys {
        check_unique_keys(candidate, registered)?;
    }

    let kind = candidate.kind();
    let same_kind = registered.iter().filter(|record| record.kind() == kind);
    let bus_no = candidate.base().bus_no;

    match candidate.device() {
        DeviceAttributes::I2c(attrs) => {
            validate_i2c(attrs.address, bus_no, same_kind, config.i2c_conflict_scope)
        }
        DeviceAttributes::Spi(attrs) => validate_spi(attrs.chip_select, bus_no, same_kind),
        DeviceAttributes::Uart(_) => validate_uart(bus_no, same_kind),
    }
}

/// I2C rule.
///
/// The reported bus number is the candidate's, also when the holder sits on
/// another bus.
pub fn validate_i2c<'a>(
    address: u8,
    bus_no: u8,
    registered: impl IntoIterator<Item = &'a SensorRecord>,
    scope: I2cConflictScope,
) -> Result<(), BusConflict> {
    for record in registered {
        let DeviceAttributes::I2c(existing) = record.device() else {
            continue;
        };
        if existing.address != address {
            continue;
        }

        let other_bus = record.base().bus_no;
        if other_bus != bus_no {
            if scope == I2cConflictScope::PerBus {
                continue;
            }
            warn!(
                "I2C address {} on bus {} collides with '{}' on bus {}",
                address,
                bus_no,
                record.alias(),
                other_bus
            );
        }

        return Err(BusConflict::I2cAddress {
            address,
            bus_no,
            holder: record.alias().to_string(),
        });
    }
    Ok(())
}

/// SPI rule.
pub fn validate_spi<'a>(
    chip_select: u8,
    bus_no: u8,
    registered: impl IntoIterator<Item = &'a SensorRecord>,
) -> Result<(), BusConflict> {
    let holder = registered.into_iter().find(|record| {
        record.base().bus_no == bus_no
            && matches!(record.device(), DeviceAttributes::Spi(attrs) if attrs.chip_select == chip_select)
    });

    match holder {
        Some(record) => Err(BusConflict::SpiChipSelect {
            bus_no,
            chip_select,
            holder: record.alias().to_string(),
        }),
        None => Ok(()),
    }
}

/// UART rule.
pub fn validate_uart<'a>(
    bus_no: u8,
    registered: impl IntoIterator<Item = &'a SensorRecord>,
) -> Result<(), BusConflict> {
    let holder = registered.into_iter().find(|record| {
        record.base().bus_no == bus_no && matches!(record.device(), DeviceAttributes::Uart(_))
    });

    match holder {
        Some(record) => Err(BusConflict::UartPort {
            bus_no,
            holder: record.alias().to_string(),
        }),
        None => Ok(()),
    }
}

/// Alias and identifier uniqueness across all kinds.
pub fn check_unique_keys(
    candidate: &SensorRecord,
    registered: &[SensorRecord],
) -> Result<(), BusConflict> {
    if registered
        .iter()
        .any(|record| record.alias() == candidate.alias())
    {
        return Err(BusConflict::DuplicateAlias {
            alias: candidate.alias().to_string(),
        });
    }

    if let Some(identifier) = candidate.identifier()
        && let Some(record) = registered
            .iter()
            .find(|record| record.identifier() == Some(identifier))
    {
        return Err(BusConflict::DuplicateIdentifier {
            identifier,
            holder: record.alias().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{BaseAttributes, I2cAttributes, SpiAttributes, UartAttributes};
    use sensorhub_core::SensorKind;

    fn i2c(bus_no: u8, address: u8, alias: &str) -> SensorRecord {
        SensorRecord::new(
            BaseAttributes::new(SensorKind::I2c, bus_no, "BM280", alias),
            DeviceAttributes::I2c(I2cAttributes::new(address)),
        )
        .unwrap()
    }

    fn spi(bus_no: u8, chip_select: u8, alias: &str) -> SensorRecord {
        SensorRecord::new(
            BaseAttributes::new(SensorKind::Spi, bus_no, "SHT721", alias),
            DeviceAttributes::Spi(SpiAttributes::new(chip_select)),
        )
        .unwrap()
    }

    fn uart(bus_no: u8, baud_rate: u32, alias: &str) -> SensorRecord {
        SensorRecord::new(
            BaseAttributes::new(SensorKind::Uart, bus_no, "Hygrometer", alias),
            DeviceAttributes::Uart(UartAttributes::new(baud_rate)),
        )
        .unwrap()
    }

    #[test]
    fn test_i2c_address_conflict_ignores_bus() {
        let registered = vec![i2c(2, 78, "A")];

        let err = check_conflicts(&i2c(9, 78, "B"), &registered, &RegistryConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            BusConflict::I2cAddress {
                address: 78,
                bus_no: 9,
                holder: "A".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "I2C address=78 already in use on bus#=9 (by 'A')"
        );
    }

    #[test]
    fn test_i2c_per_bus_scope() {
        let registered = vec![i2c(2, 78, "A")];
        let config = RegistryConfig::default().i2c_conflict_scope(I2cConflictScope::PerBus);

        assert!(check_conflicts(&i2c(9, 78, "B"), &registered, &config).is_ok());
        assert!(check_conflicts(&i2c(2, 78, "C"), &registered, &config).is_err());
    }

    #[test]
    fn test_i2c_distinct_address() {
        let registered = vec![i2c(2, 78, "A")];
        assert!(check_conflicts(&i2c(2, 77, "B"), &registered, &RegistryConfig::default()).is_ok());
    }

    #[test]
    fn test_spi_conflict_needs_bus_and_chip_select() {
        let registered = vec![spi(1, 3, "RHT-sensor2A")];
        let config = RegistryConfig::default();

        assert!(matches!(
            check_conflicts(&spi(1, 3, "IMU-A1"), &registered, &config),
            Err(BusConflict::SpiChipSelect { bus_no: 1, chip_select: 3, .. })
        ));
        assert!(check_conflicts(&spi(1, 4, "IMU-A2"), &registered, &config).is_ok());
        assert!(check_conflicts(&spi(2, 3, "IMU-B1"), &registered, &config).is_ok());
    }

    #[test]
    fn test_uart_port_conflict_ignores_baud_rate() {
        let registered = vec![uart(4, 115_200, "RHT-sensor3")];
        let config = RegistryConfig::default();

        let err = check_conflicts(&uart(4, 38_400, "RHT-sensor4"), &registered, &config)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "UART serial port=4 already in use (by 'RHT-sensor3')"
        );
        assert!(check_conflicts(&uart(5, 115_200, "RHT-sensor5"), &registered, &config).is_ok());
    }

    #[test]
    fn test_kinds_do_not_conflict_with_each_other() {
        // Same bus number, different kinds
        let registered = vec![i2c(1, 3, "A"), uart(1, 9_600, "B")];
        assert!(check_conflicts(&spi(1, 3, "C"), &registered, &RegistryConfig::default()).is_ok());
    }

    #[test]
    fn test_duplicate_alias_only_when_enforced() {
        let registered = vec![i2c(2, 78, "RHT")];
        let candidate = spi(1, 3, "RHT");

        assert!(check_conflicts(&candidate, &registered, &RegistryConfig::default()).is_ok());

        let config = RegistryConfig::default().enforce_unique_keys(true);
        assert_eq!(
            check_conflicts(&candidate, &registered, &config),
            Err(BusConflict::DuplicateAlias {
                alias: "RHT".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_identifier() {
        let id = Uuid::from_u128(7);
        let mut first = i2c(2, 78, "A");
        first.set_identifier(id);
        let mut candidate = spi(1, 3, "B");
        candidate.set_identifier(id);

        assert_eq!(
            check_unique_keys(&candidate, &[first]),
            Err(BusConflict::DuplicateIdentifier {
                identifier: id,
                holder: "A".to_string()
            })
        );
    }
}
