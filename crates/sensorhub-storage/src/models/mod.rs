pub mod sensor;

pub use sensor::{NewSensor, StoredSensor};
