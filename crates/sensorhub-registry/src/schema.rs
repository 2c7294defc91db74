//! Declarative configuration schemas and the checks run against them.
//!
//! A sensor configuration is validated in two tiers: the base schema covers
//! the bus-generic fields every external sensor carries, and one device
//! schema per [`SensorKind`] covers the fields of that bus family. Each
//! schema lists its required field names and the primitive type (and, for
//! integers, the inclusive range) of every property it declares.
//!
//! Type checks follow JSON Schema Draft 4: an integer property only accepts
//! JSON numbers without a fractional part, so `2.0` is rejected.
//!
//! # Examples
//!
//! ```
//! use sensorhub_registry::schema::{self, BASE_SCHEMA, I2C_SCHEMA};
//! use serde_json::json;
//!
//! let config = json!({
//!     "sensor_type": "i2c",
//!     "bus_no": 2,
//!     "i2c_addr": 78,
//!     "dev_name": "BM280",
//!     "alias": "RHT-sensor1",
//! });
//! let config = config.as_object().unwrap();
//!
//! assert!(schema::check(&BASE_SCHEMA, config));
//! assert!(schema::check(&I2C_SCHEMA, config));
//! assert!(!schema::detect_unknown_fields(&[&BASE_SCHEMA, &I2C_SCHEMA], config));
//! ```

use sensorhub_core::{SensorKind, constants::*};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

/// A parsed configuration object.
pub type ConfigObject = Map<String, Value>;

/// Primitive type of a declared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    String,
    Boolean,
}

impl FieldType {
    /// Returns `true` if `value` is of this type.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::String => value.is_string(),
            FieldType::Boolean => value.is_boolean(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON type name of a value, in the vocabulary used by violations.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Integer value of a JSON number, widened so `u64` values fit.
fn integer_value(value: &Value) -> Option<i128> {
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
}

/// A single declared property: its name, type and optional integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldType,
    /// Inclusive bounds, integers only.
    pub range: Option<(i64, i64)>,
}

impl FieldDef {
    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldType::Integer,
            range: None,
        }
    }

    pub const fn bounded(name: &'static str, min: i64, max: i64) -> Self {
        Self {
            name,
            kind: FieldType::Integer,
            range: Some((min, max)),
        }
    }

    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldType::String,
            range: None,
        }
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldType::Boolean,
            range: None,
        }
    }

    /// Check one present value against this definition.
    fn check_value(&self, value: &Value) -> Option<SchemaViolation> {
        if !self.kind.matches(value) {
            return Some(SchemaViolation::WrongType {
                field: self.name,
                expected: self.kind,
                found: json_type_name(value),
            });
        }

        let (min, max) = self.range?;
        let value = integer_value(value)?;
        if value < i128::from(min) || value > i128::from(max) {
            return Some(SchemaViolation::OutOfRange {
                field: self.name,
                min,
                max,
                value,
            });
        }
        None
    }
}

/// A structural schema: required field names and declared properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Name used in log output.
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub properties: &'static [FieldDef],
}

impl Schema {
    /// Look up a declared property.
    pub fn property(&self, name: &str) -> Option<&FieldDef> {
        self.properties.iter().find(|def| def.name == name)
    }

    /// Returns `true` if `name` is a declared property.
    pub fn declares(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Device schema for a sensor kind.
    pub fn for_kind(kind: SensorKind) -> &'static Schema {
        match kind {
            SensorKind::I2c => &I2C_SCHEMA,
            SensorKind::Spi => &SPI_SCHEMA,
            SensorKind::Uart => &UART_SCHEMA,
        }
    }
}

/// Bus-generic fields shared by every external sensor.
pub static BASE_SCHEMA: Schema = Schema {
    name: "base",
    required: &["sensor_type", "bus_no", "dev_name", "alias"],
    properties: &[
        FieldDef::bounded("uuid", 0, i64::MAX),
        FieldDef::string("sensor_type"),
        FieldDef::bounded("bus_no", 0, MAX_BUS_NO as i64),
        FieldDef::string("dev_name"),
        FieldDef::string("alias"),
        FieldDef::boolean("pwr_control"),
    ],
};

pub static I2C_SCHEMA: Schema = Schema {
    name: "i2c",
    required: &["i2c_addr"],
    properties: &[
        FieldDef::bounded("i2c_addr", MIN_I2C_ADDR as i64, MAX_I2C_ADDR as i64),
        FieldDef::bounded("clk_speed", 1, u32::MAX as i64),
    ],
};

pub static SPI_SCHEMA: Schema = Schema {
    name: "spi",
    required: &["cs_no"],
    properties: &[
        FieldDef::bounded("cs_no", MIN_CS_VAL as i64, MAX_CS_VAL as i64),
        FieldDef::bounded("data_bits", 1, MAX_SPI_DATA_BITS as i64),
        FieldDef::bounded("spi_mode", 0, MAX_SPI_MODE as i64),
        FieldDef::bounded("clk_speed", 1, u32::MAX as i64),
        FieldDef::boolean("msb_first"),
        FieldDef::boolean("cs_toggle"),
        FieldDef::bounded("cycles_before", 0, u32::MAX as i64),
        FieldDef::bounded("cycles_after", 0, u32::MAX as i64),
    ],
};

pub static UART_SCHEMA: Schema = Schema {
    name: "uart",
    required: &["baud_rate"],
    properties: &[
        FieldDef::bounded("baud_rate", MIN_BAUD_RATE as i64, MAX_BAUD_RATE as i64),
        FieldDef::bounded(
            "data_bits",
            MIN_UART_DATA_BITS as i64,
            MAX_UART_DATA_BITS as i64,
        ),
        FieldDef::boolean("parity"),
        FieldDef::bounded("stop_bits", 1, MAX_STOP_BITS as i64),
    ],
};

/// One reason a configuration does not satisfy a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("missing required property {field}")]
    MissingRequired { field: &'static str },

    #[error("property {field} has wrong type: expected {expected}, got {found}")]
    WrongType {
        field: &'static str,
        expected: FieldType,
        found: &'static str,
    },

    #[error("property {field} must be {min}-{max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i128,
    },

    /// `sensor_type` names no supported kind, so no device schema applies.
    #[error("unsupported sensor type '{value}'")]
    UnsupportedKind { value: String },
}

impl SchemaViolation {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingRequired { field }
            | Self::WrongType { field, .. }
            | Self::OutOfRange { field, .. } => *field,
            Self::UnsupportedKind { .. } => "sensor_type",
        }
    }
}

/// Collect every violation of `schema` in `config`.
///
/// Missing required fields are reported first, in the schema's order,
/// followed by type and range violations of the present properties.
pub fn validate(schema: &Schema, config: &ConfigObject) -> Vec<SchemaViolation> {
    let missing = schema
        .required
        .iter()
        .copied()
        .filter(|field| !config.contains_key(*field))
        .map(|field| SchemaViolation::MissingRequired { field });

    let invalid = schema.properties.iter().filter_map(|def| {
        config
            .get(def.name)
            .and_then(|value| def.check_value(value))
    });

    missing.chain(invalid).collect()
}

/// Check `config` against `schema`, logging each violation.
///
/// Never fails; returns `false` if at least one violation was found.
pub fn check(schema: &Schema, config: &ConfigObject) -> bool {
    let violations = validate(schema, config);
    for violation in &violations {
        warn!(schema = schema.name, "Configuration rejected: {}", violation);
    }
    violations.is_empty()
}

/// Keys of `config` declared by none of `schemas`, in key order.
pub fn unknown_fields(schemas: &[&Schema], config: &ConfigObject) -> Vec<String> {
    config
        .keys()
        .filter(|key| !schemas.iter().any(|schema| schema.declares(key)))
        .cloned()
        .collect()
}

/// Returns `true` if any key of `config` is declared by none of `schemas`.
///
/// Every key is checked against the union of all declared properties.
pub fn detect_unknown_fields(schemas: &[&Schema], config: &ConfigObject) -> bool {
    config
        .keys()
        .any(|key| !schemas.iter().any(|schema| schema.declares(key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn object(value: Value) -> ConfigObject {
        value.as_object().cloned().unwrap()
    }

    fn i2c_config() -> ConfigObject {
        object(json!({
            "sensor_type": "i2c",
            "bus_no": 2,
            "i2c_addr": 78,
            "dev_name": "BM280",
            "alias": "RHT-sensor1",
        }))
    }

    #[test]
    fn test_valid_config_passes_both_tiers() {
        let config = i2c_config();
        assert!(validate(&BASE_SCHEMA, &config).is_empty());
        assert!(validate(&I2C_SCHEMA, &config).is_empty());
        assert!(check(&BASE_SCHEMA, &config));
    }

    #[rstest]
    #[case("sensor_type")]
    #[case("bus_no")]
    #[case("dev_name")]
    #[case("alias")]
    fn test_missing_base_field(#[case] field: &str) {
        let mut config = i2c_config();
        config.remove(field);

        let violations = validate(&BASE_SCHEMA, &config);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field(), field);
        assert!(matches!(violations[0], SchemaViolation::MissingRequired { .. }));
        assert!(!check(&BASE_SCHEMA, &config));
    }

    #[test]
    fn test_missing_device_field() {
        let mut config = i2c_config();
        config.remove("i2c_addr");

        assert_eq!(
            validate(&I2C_SCHEMA, &config),
            vec![SchemaViolation::MissingRequired { field: "i2c_addr" }]
        );
    }

    #[rstest]
    #[case("bus_no", json!("2"), "string")]
    #[case("bus_no", json!(2.0), "number")]
    #[case("alias", json!(7), "integer")]
    #[case("pwr_control", json!(1), "integer")]
    #[case("uuid", json!(null), "null")]
    fn test_wrong_type(#[case] field: &str, #[case] value: Value, #[case] found: &str) {
        let mut config = i2c_config();
        config.insert(field.to_string(), value);

        let violations = validate(&BASE_SCHEMA, &config);
        assert_eq!(violations.len(), 1);
        match &violations[0] {
            SchemaViolation::WrongType {
                field: f,
                found: got,
                ..
            } => {
                assert_eq!(*f, field);
                assert_eq!(*got, found);
            }
            other => panic!("unexpected violation {other:?}"),
        }
    }

    #[rstest]
    #[case(&I2C_SCHEMA, "i2c_addr", json!(128))]
    #[case(&SPI_SCHEMA, "cs_no", json!(8))]
    #[case(&SPI_SCHEMA, "spi_mode", json!(4))]
    #[case(&UART_SCHEMA, "baud_rate", json!(921_600))]
    #[case(&UART_SCHEMA, "stop_bits", json!(3))]
    #[case(&BASE_SCHEMA, "bus_no", json!(-1))]
    #[case(&BASE_SCHEMA, "uuid", json!(-5))]
    #[case(&BASE_SCHEMA, "uuid", json!(u64::MAX))]
    fn test_out_of_range(#[case] schema: &Schema, #[case] field: &str, #[case] value: Value) {
        let mut config = ConfigObject::new();
        config.insert(field.to_string(), value);

        let violations = validate(schema, &config);
        assert!(
            violations
                .iter()
                .any(|v| matches!(v, SchemaViolation::OutOfRange { field: f, .. } if *f == field))
        );
    }

    #[test]
    fn test_out_of_range_message() {
        let config = object(json!({"i2c_addr": 200}));
        let violations = validate(&I2C_SCHEMA, &config);
        assert_eq!(violations[0].to_string(), "property i2c_addr must be 0-127, got 200");
    }

    #[test]
    fn test_missing_reported_before_type_errors() {
        let config = object(json!({"bus_no": "two", "sensor_type": "i2c", "alias": "a"}));

        let violations = validate(&BASE_SCHEMA, &config);
        assert_eq!(
            violations[0],
            SchemaViolation::MissingRequired { field: "dev_name" }
        );
        assert!(matches!(violations[1], SchemaViolation::WrongType { field: "bus_no", .. }));
    }

    #[test]
    fn test_unknown_fields_union_of_schemas() {
        let config = i2c_config();

        // i2c_addr is only known to the device schema
        assert!(detect_unknown_fields(&[&BASE_SCHEMA], &config));
        assert!(!detect_unknown_fields(&[&BASE_SCHEMA, &I2C_SCHEMA], &config));
        assert!(!detect_unknown_fields(&[&I2C_SCHEMA, &BASE_SCHEMA], &config));
    }

    #[test]
    fn test_unknown_fields_misspelled() {
        let mut config = i2c_config();
        config.insert("clock_speed".to_string(), json!(100_000));

        assert!(detect_unknown_fields(&[&BASE_SCHEMA, &I2C_SCHEMA], &config));
        assert_eq!(
            unknown_fields(&[&BASE_SCHEMA, &I2C_SCHEMA], &config),
            vec!["clock_speed".to_string()]
        );
    }

    #[test]
    fn test_unknown_fields_other_kind() {
        // cs_no belongs to SPI, not I2C
        let mut config = i2c_config();
        config.insert("cs_no".to_string(), json!(3));

        assert_eq!(
            unknown_fields(&[&BASE_SCHEMA, &I2C_SCHEMA], &config),
            vec!["cs_no".to_string()]
        );
    }

    #[test]
    fn test_schema_for_kind() {
        for kind in SensorKind::ALL {
            assert_eq!(Schema::for_kind(kind).name, kind.as_str());
        }
        assert!(SPI_SCHEMA.declares("msb_first"));
        assert!(!UART_SCHEMA.declares("clk_speed"));
    }
}
