//! Sensor subsystem: one adapter per sensor kind and the aggregating
//! [`SensorHub`].
//!
//! Every adapter implements [`Sensor`], so a polling loop can keep any mix
//! of them in one ordered collection:
//!
//! | Adapter        | Kind              | Handle                     | Fields            |
//! |----------------|-------------------|----------------------------|-------------------|
//! | `DhtSensor`    | `Dht11` / `Dht22` | humidity driver on a pin   | `t h`             |
//! | `Bme280Sensor` | `Bme280`          | environment driver on I2C  | `t h p`           |
//! | `Bh1750Sensor` | `Bh1750`          | I2C device                 | `lux`             |
//! | `Ds18b20Bus`   | `Ds18b20`         | one-wire driver on a pin   | `t0 t1 ...`       |
//! | `ButtonBank`   | `Buttons`         | input pins                 | `b0 _b0 b1 _b1 ...` |
//! | `Hcsr04`       | `Hcsr04`          | trigger pin + echo timer   | `d`               |

pub mod bh1750;
pub mod bme280;
pub mod buttons;
pub mod dht;
pub mod ds18b20;
pub mod hcsr04;
pub mod hub;
pub mod ports;
pub mod value;

use crate::error::{Error, Result};
use value::{NamedValues, Values};

pub use bh1750::Bh1750Sensor;
pub use bme280::Bme280Sensor;
pub use buttons::ButtonBank;
pub use dht::{DhtSensor, DhtVariant};
pub use ds18b20::Ds18b20Bus;
pub use hcsr04::Hcsr04;
pub use hub::SensorHub;

/// Which physical part an adapter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SensorKind {
    Dht11,
    Dht22,
    Bme280,
    Bh1750,
    Ds18b20,
    Buttons,
    Hcsr04,
}

impl SensorKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dht11 => "DHT11",
            Self::Dht22 => "DHT22",
            Self::Bme280 => "BME280",
            Self::Bh1750 => "BH1750",
            Self::Ds18b20 => "DS18B20",
            Self::Buttons => "BUTTONS",
            Self::Hcsr04 => "HCSR04",
        }
    }
}

impl core::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform polling interface shared by every adapter.
///
/// `values` and `values_dict` never touch hardware; they report whatever the
/// last successful `read` stored, or `None` per field before the first one.
pub trait Sensor {
    fn kind(&self) -> SensorKind;

    /// Run one measurement, store it, and return the new ordered values.
    /// On error the stored values are left as they were.
    fn read(&mut self) -> Result<Values>;

    /// Last readings in field order.
    fn values(&self) -> Values;

    /// Last readings keyed by field name.
    fn values_dict(&self) -> NamedValues;
}

impl<S: Sensor + ?Sized> Sensor for Box<S> {
    fn kind(&self) -> SensorKind {
        (**self).kind()
    }

    fn read(&mut self) -> Result<Values> {
        (**self).read()
    }

    fn values(&self) -> Values {
        (**self).values()
    }

    fn values_dict(&self) -> NamedValues {
        (**self).values_dict()
    }
}

/// I2C addresses are 7-bit.
pub(crate) fn check_address(address: u8) -> Result<()> {
    if address > 0x7f {
        return Err(Error::Config("I2C address must be 7-bit"));
    }
    Ok(())
}
