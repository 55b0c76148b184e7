//! Unified error types for the sensor adapters.
//!
//! A single `Error` enum that every adapter funnels into, so a polling loop
//! holding heterogeneous sensors handles failures uniformly.  All variants
//! are `Copy`; bus and pin errors are reduced to their portable
//! `embedded-hal` error kinds.

use core::fmt;

use embedded_hal::{digital, i2c};

/// `errno` value the platform pulse timer reports when no edge arrives in time.
pub const ETIMEDOUT: i32 = 110;
/// `errno` value for a generic I/O failure.
pub const EIO: i32 = 5;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor measurement failed.
    Sensor(SensorError),
    /// A constructor or config argument is invalid.  Never retried.
    Config(&'static str),
    /// Serialising a snapshot or config failed at runtime.
    Encode(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Encode(msg) => write!(f, "encode: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Protocol handshake did not complete in time.
    Timeout,
    /// Frame checksum mismatch.
    Checksum,
    /// Ultrasonic echo never returned: nothing within range.
    OutOfRange,
    /// No device answered on the bus.
    NoDevice,
    /// I2C transaction failed.
    I2c(i2c::ErrorKind),
    /// GPIO read or write failed.
    Gpio(digital::ErrorKind),
    /// Platform I/O error carrying the raw `errno` code.
    Io(i32),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "handshake timed out"),
            Self::Checksum => write!(f, "checksum mismatch"),
            Self::OutOfRange => write!(f, "out of range"),
            Self::NoDevice => write!(f, "no device on bus"),
            Self::I2c(kind) => write!(f, "I2C: {kind}"),
            Self::Gpio(kind) => write!(f, "GPIO: {kind}"),
            Self::Io(code) => write!(f, "I/O error (errno {code})"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// embedded-hal conversions
// ---------------------------------------------------------------------------

/// Reduce any HAL I2C error to its portable kind.
pub(crate) fn i2c_error<E: i2c::Error>(e: E) -> Error {
    Error::Sensor(SensorError::I2c(e.kind()))
}

/// Reduce any HAL GPIO error to its portable kind.
pub(crate) fn gpio_error<E: digital::Error>(e: E) -> Error {
    Error::Sensor(SensorError::Gpio(e.kind()))
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
