use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown sensor kind: {0}")]
    InvalidSensorKind(String),

    #[error("{field} must be {min}-{max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
}

impl Error {
    /// Create a new out-of-range error for a named field.
    pub fn out_of_range(field: &'static str, min: i64, max: i64, value: i64) -> Self {
        Self::OutOfRange {
            field,
            min,
            max,
            value,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
