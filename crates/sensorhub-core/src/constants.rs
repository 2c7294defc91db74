//! Bus limits and attribute defaults for external sensors.
//!
//! These constants describe the resource ranges each bus family can address
//! and the values a sensor receives when its configuration leaves an optional
//! attribute out. The schema declarations and the sensor builder both read
//! from here, so a range only ever changes in one place.
//!
//! # Usage
//!
//! ```
//! use sensorhub_core::constants::*;
//!
//! fn is_valid_i2c_address(address: u8) -> bool {
//!     address <= MAX_I2C_ADDR
//! }
//!
//! assert!(is_valid_i2c_address(78));
//! assert!(!is_valid_i2c_address(200));
//! assert_eq!(DEFAULT_CLOCK_SPEED, 100_000);
//! ```

// ============================================================================
// Generic Bus Limits
// ============================================================================

/// Highest bus (interface) number a sensor can be attached to.
pub const MAX_BUS_NO: u8 = u8::MAX;

/// Placeholder stored when a device name or alias is given as an empty string.
pub const UNNAMED: &str = "none";

// ============================================================================
// I2C
// ============================================================================

/// Lowest 7-bit I2C device address.
pub const MIN_I2C_ADDR: u8 = 0;

/// Highest 7-bit I2C device address.
pub const MAX_I2C_ADDR: u8 = 127;

/// Default bus clock for I2C and SPI devices (Hz).
///
/// # Value: 100 kHz (I2C standard mode)
pub const DEFAULT_CLOCK_SPEED: u32 = 100_000;

// ============================================================================
// SPI
// ============================================================================

/// Lowest SPI chip-select line.
pub const MIN_CS_VAL: u8 = 0;

/// Highest SPI chip-select line.
pub const MAX_CS_VAL: u8 = 7;

/// Default SPI mode (CPOL=0, CPHA=0).
pub const DEFAULT_SPI_MODE: u8 = 0;

/// Highest SPI mode (CPOL=1, CPHA=1).
pub const MAX_SPI_MODE: u8 = 3;

/// Default word size for SPI and UART transfers.
pub const DEFAULT_DATA_BITS: u8 = 8;

/// Largest SPI word size accepted in configuration.
pub const MAX_SPI_DATA_BITS: u8 = 32;

/// SPI transfers shift the most significant bit first unless configured otherwise.
pub const DEFAULT_MSB_FIRST: bool = true;

/// Chip-select is toggled between words unless configured otherwise.
pub const DEFAULT_CS_TOGGLE: bool = true;

/// Idle clock cycles inserted before and after a transfer.
pub const DEFAULT_CYCLES: u32 = 0;

// ============================================================================
// UART
// ============================================================================

/// Lowest supported UART baud rate.
pub const MIN_BAUD_RATE: u32 = 2_400;

/// Highest supported UART baud rate.
pub const MAX_BAUD_RATE: u32 = 921_400;

/// Smallest UART character size.
pub const MIN_UART_DATA_BITS: u8 = 5;

/// Largest UART character size.
pub const MAX_UART_DATA_BITS: u8 = 9;

/// Parity is disabled unless configured otherwise.
pub const DEFAULT_PARITY: bool = false;

/// Default number of UART stop bits.
pub const DEFAULT_STOP_BITS: u8 = 1;

/// Largest number of UART stop bits.
pub const MAX_STOP_BITS: u8 = 2;
