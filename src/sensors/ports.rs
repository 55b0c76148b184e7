//! Port traits: the boundary between the adapters and external drivers.
//!
//! ```text
//!   vendor driver / platform ──▶ port trait ──▶ sensor adapter
//! ```
//!
//! The humidity-sensor, environmental-sensor, and one-wire drivers are
//! vendor code the adapters delegate to; this module only fixes the
//! shape of that delegation.  Plain GPIO, I2C and delays use the
//! `embedded-hal` traits directly and need no port here.

use crate::error::Result;

// ───────────────────────────────────────────────────────────────
// Humidity / temperature driver (DHT11, DHT22)
// ───────────────────────────────────────────────────────────────

/// One completed single-wire measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumidityMeasurement {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Driver for the single-wire humidity/temperature handshake.
pub trait HumidityDriver {
    /// Data pin type the driver drives.
    type Pin;

    /// Bind the driver to its data pin.
    fn attach(pin: Self::Pin) -> Self
    where
        Self: Sized;

    /// Run the handshake.  Timeouts and checksum failures are reported as
    /// [`SensorError::Timeout`](crate::error::SensorError::Timeout) and
    /// [`SensorError::Checksum`](crate::error::SensorError::Checksum).
    fn measure(&mut self) -> Result<HumidityMeasurement>;
}

// ───────────────────────────────────────────────────────────────
// Environmental driver (BME280)
// ───────────────────────────────────────────────────────────────

/// Compensated temperature, pressure and humidity from one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentMeasurement {
    pub temperature_c: f32,
    pub pressure_hpa: f32,
    pub humidity_pct: f32,
}

/// Driver for a pressure/temperature/humidity sensor on an I2C bus.
pub trait EnvironmentDriver {
    /// I2C device handle type.
    type Bus;

    /// Bind the driver to a bus handle and 7-bit device address.
    fn attach(i2c: Self::Bus, address: u8) -> Result<Self>
    where
        Self: Sized;

    /// Sample all three quantities in one transaction.
    fn sample(&mut self) -> Result<EnvironmentMeasurement>;
}

// ───────────────────────────────────────────────────────────────
// One-wire temperature bus (DS18X20)
// ───────────────────────────────────────────────────────────────

/// 64-bit one-wire ROM code (family, serial, CRC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RomId(pub [u8; 8]);

impl RomId {
    pub fn family(&self) -> u8 {
        self.0[0]
    }
}

impl core::fmt::Display for RomId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Upper bound on probes tracked on one bus.
pub const MAX_PROBES: usize = 16;

/// Driver for DS18X20 probes sharing one data line.
pub trait OneWireTemperatureBus {
    /// Bus pin type.
    type Pin;

    /// Bind the driver to the bus pin and reset the line.
    fn attach(pin: Self::Pin) -> Result<Self>
    where
        Self: Sized;

    /// Enumerate attached probes.  Order is the bus search order; search
    /// stops after [`MAX_PROBES`] ids.
    fn scan(&mut self) -> Result<heapless::Vec<RomId, MAX_PROBES>>;

    /// Broadcast "convert T" to every probe.
    fn convert_all(&mut self) -> Result<()>;

    /// Read the last converted temperature of one probe (°C).
    fn read_temperature(&mut self, rom: &RomId) -> Result<f32>;
}

// ───────────────────────────────────────────────────────────────
// Echo pulse timing (HC-SR04)
// ───────────────────────────────────────────────────────────────

/// Measures the width of a pulse on an input, like a platform
/// `time_pulse_us` call.
pub trait PulseTimer {
    /// Wait for `level`, then time how long the input stays there.
    ///
    /// Both waits are bounded by `timeout_us`.  On failure returns the
    /// platform `errno` code; [`ETIMEDOUT`](crate::error::ETIMEDOUT) when
    /// an edge never arrived.
    fn time_pulse_us(&mut self, level: bool, timeout_us: u32) -> core::result::Result<u32, i32>;
}

/// Free-running microsecond counter.
pub trait MicrosClock {
    fn now_us(&mut self) -> u64;
}
