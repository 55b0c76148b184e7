//! BH1750FVI ambient light sensor, driven directly over I2C.
//!
//! Each read is a fixed one-shot sequence:
//!
//! | Step | Bus traffic     | Meaning                         |
//! |------|-----------------|---------------------------------|
//! | 1    | write `0x00`    | power down, clean state         |
//! | 2    | write `0x01`    | power on                        |
//! | 3    | write `0x23`    | one-time high-resolution mode   |
//! | 4    | wait 180 ms     | worst-case conversion           |
//! | 5    | read 2 bytes    | big-endian raw count            |
//! | 6    | write `0x00`    | power down again                |

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info};

use super::value::{NamedValues, Values, values_of};
use super::{Sensor, SensorKind, check_address};
use crate::error::{Result, i2c_error};

/// ADDR pin tied low.
pub const DEFAULT_ADDRESS: u8 = 0x23;

pub const CMD_POWER_DOWN: u8 = 0x00;
pub const CMD_POWER_ON: u8 = 0x01;
pub const CMD_ONE_TIME_HIGH_RES: u8 = 0x23;

/// High-resolution conversion time.
pub const CONVERSION_MS: u32 = 180;

/// Folds the datasheet's 1.2 count-per-lux factor into the
/// `(b0 << 24 | b1 << 16)` scaling.  Verified constant; do not re-derive.
pub const LUX_DIVISOR: u32 = 78_642;

const FIELDS: [&str; 1] = ["lux"];

/// Convert the two raw result bytes to whole lux.
pub fn raw_to_lux(raw: [u8; 2]) -> u32 {
    ((u32::from(raw[0]) << 24) | (u32::from(raw[1]) << 16)) / LUX_DIVISOR
}

pub struct Bh1750Sensor<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    conversion_ms: u32,
    lux: Option<u32>,
}

impl<I2C: I2c, D: DelayNs> Bh1750Sensor<I2C, D> {
    /// Bind at [`DEFAULT_ADDRESS`].
    pub fn new(i2c: I2C, delay: D) -> Result<Self> {
        Self::with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Result<Self> {
        check_address(address)?;
        info!("BH1750: bound at 0x{:02x}", address);
        Ok(Self {
            i2c,
            delay,
            address,
            conversion_ms: CONVERSION_MS,
            lux: None,
        })
    }

    /// Override the conversion wait (e.g. from config).
    pub fn set_conversion_ms(&mut self, ms: u32) {
        self.conversion_ms = ms;
    }

    pub fn lux(&self) -> Option<u32> {
        self.lux
    }

    fn command(&mut self, cmd: u8) -> Result<()> {
        self.i2c.write(self.address, &[cmd]).map_err(i2c_error)
    }
}

impl<I2C: I2c, D: DelayNs> Sensor for Bh1750Sensor<I2C, D> {
    fn kind(&self) -> SensorKind {
        SensorKind::Bh1750
    }

    fn read(&mut self) -> Result<Values> {
        self.command(CMD_POWER_DOWN)?;
        self.command(CMD_POWER_ON)?;
        self.command(CMD_ONE_TIME_HIGH_RES)?;
        self.delay.delay_ms(self.conversion_ms);

        let mut raw = [0u8; 2];
        self.i2c.read(self.address, &mut raw).map_err(i2c_error)?;
        self.command(CMD_POWER_DOWN)?;

        let lux = raw_to_lux(raw);
        self.lux = Some(lux);
        debug!("BH1750: raw={:02x?} lux={}", raw, lux);
        Ok(self.values())
    }

    fn values(&self) -> Values {
        // Maximum count is 0xffff_0000 / 78642 < i32::MAX.
        values_of([self.lux.map(|l| l as i32)])
    }

    fn values_dict(&self) -> NamedValues {
        NamedValues::zip(&FIELDS, &self.values())
    }
}
