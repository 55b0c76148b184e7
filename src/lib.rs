//! SensorBank library.
//!
//! Polling adapters for DHT11/DHT22, BME280, BH1750, DS18B20, button banks
//! and HC-SR04 rangers behind one [`sensors::Sensor`] trait.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`;
//! everything else builds and tests on the host against `adapters::sim`.

#![deny(unused_must_use)]

pub mod adapters;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod sensors;

pub use error::{Error, Result, SensorError};
pub use sensors::{Sensor, SensorHub, SensorKind};
