//! Sensor bank configuration
//!
//! Bus addresses and protocol timings for every adapter.  Defaults are the
//! datasheet values; a board can override them from storage (postcard) or
//! a provisioning message (JSON).

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sensors::{bh1750, bme280, dht, ds18b20, hcsr04};

/// NVS namespace and key the board keeps its config blob under.
pub const NVS_NAMESPACE: &str = "sensorbank";
pub const NVS_CONFIG_KEY: &str = "config";
/// Upper bound on the postcard encoding (two bytes + five varint `u32`s).
pub const MAX_BLOB_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorBankConfig {
    // --- I2C ---
    /// BME280 7-bit address (0x76 or 0x77)
    pub bme280_address: u8,
    /// BH1750 7-bit address (0x23 or 0x5C)
    pub bh1750_address: u8,

    // --- Timing ---
    /// DHT post-power-up settle time (milliseconds)
    pub dht_settle_ms: u32,
    /// BH1750 high-resolution conversion time (milliseconds)
    pub bh1750_conversion_ms: u32,
    /// DS18B20 conversion time (milliseconds)
    pub ds18b20_conversion_ms: u32,
    /// HC-SR04 echo timeout (microseconds)
    pub echo_timeout_us: u32,
    /// Polling loop period (milliseconds)
    pub poll_interval_ms: u32,
}

impl Default for SensorBankConfig {
    fn default() -> Self {
        Self {
            // I2C
            bme280_address: bme280::DEFAULT_ADDRESS,
            bh1750_address: bh1750::DEFAULT_ADDRESS,

            // Timing
            dht_settle_ms: dht::SETTLE_MS,
            bh1750_conversion_ms: bh1750::CONVERSION_MS,
            ds18b20_conversion_ms: ds18b20::CONVERSION_MS,
            echo_timeout_us: hcsr04::DEFAULT_ECHO_TIMEOUT_US,
            poll_interval_ms: 2000,
        }
    }
}

impl SensorBankConfig {
    /// Reject values no adapter can work with.  Never clamps.
    pub fn validate(&self) -> Result<()> {
        if self.bme280_address > 0x7f || self.bh1750_address > 0x7f {
            return Err(Error::Config("I2C address must be 7-bit"));
        }
        if self.bme280_address == self.bh1750_address {
            return Err(Error::Config("BME280 and BH1750 share an address"));
        }
        if self.bh1750_conversion_ms == 0 || self.ds18b20_conversion_ms == 0 {
            return Err(Error::Config("conversion time must be non-zero"));
        }
        if self.echo_timeout_us == 0 {
            return Err(Error::Config("echo timeout must be non-zero"));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll interval must be non-zero"));
        }
        Ok(())
    }

    /// Compact encoding for flash storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| Error::Encode("config"))
    }

    /// Decode and validate a stored blob.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let cfg: Self =
            postcard::from_bytes(bytes).map_err(|_| Error::Config("stored config corrupted"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a JSON document; missing fields are an error.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("config JSON malformed"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Boot-time load of a stored blob.  Nothing stored, or a blob that
    /// fails to decode or validate, yields the defaults.
    pub fn from_bytes_or_default(blob: Option<&[u8]>) -> Self {
        Self::or_default(blob.map(Self::from_bytes), "stored")
    }

    /// As [`from_bytes_or_default`](Self::from_bytes_or_default) for a JSON document.
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        Self::or_default(json.map(Self::from_json), "JSON")
    }

    fn or_default(loaded: Option<Result<Self>>, origin: &str) -> Self {
        match loaded {
            None => {
                info!("Config: no {} config, using defaults", origin);
                Self::default()
            }
            Some(Ok(cfg)) => {
                info!("Config: loaded {} config", origin);
                cfg
            }
            Some(Err(e)) => {
                warn!("Config: {} config rejected ({}), using defaults", origin, e);
                Self::default()
            }
        }
    }
}
