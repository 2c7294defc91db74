pub mod sensor;

pub use sensor::{SensorRepository, SqliteSensorRepository};
