//! Host information published as Home Assistant sensors.

pub mod temperatures;

pub use temperatures::{TemperatureProbes, TemperatureSensors};
