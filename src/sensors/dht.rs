//! DHT11 / DHT22 single-wire humidity and temperature probes.
//!
//! The handshake itself lives in the external [`HumidityDriver`]; this
//! adapter binds it to a pin, waits for the sensor to settle after power
//! up, and keeps the last reading rounded to 0.1.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use super::ports::HumidityDriver;
use super::value::{NamedValues, Values, round_to, values_of};
use super::{Sensor, SensorKind};
use crate::error::Result;

/// Post-power-up wait before the first valid handshake.
pub const SETTLE_MS: u32 = 1000;

const FIELDS: [&str; 2] = ["t", "h"];

/// Which DHT part is on the pin.  Both speak the same handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhtVariant {
    Dht11,
    Dht22,
}

pub struct DhtSensor<H> {
    variant: DhtVariant,
    driver: H,
    temperature_c: Option<f32>,
    humidity_pct: Option<f32>,
}

impl<H: HumidityDriver> DhtSensor<H> {
    /// Attach the driver to `pin` and block for [`SETTLE_MS`].
    pub fn new(variant: DhtVariant, pin: H::Pin, delay: &mut impl DelayNs) -> Self {
        Self::with_settle(variant, pin, delay, SETTLE_MS)
    }

    /// As [`new`](Self::new) with a configured settle time.
    pub fn with_settle(
        variant: DhtVariant,
        pin: H::Pin,
        delay: &mut impl DelayNs,
        settle_ms: u32,
    ) -> Self {
        let driver = H::attach(pin);
        delay.delay_ms(settle_ms);
        info!("{:?}: attached, settled {} ms", variant, settle_ms);
        Self {
            variant,
            driver,
            temperature_c: None,
            humidity_pct: None,
        }
    }

    pub fn variant(&self) -> DhtVariant {
        self.variant
    }

    pub fn temperature_c(&self) -> Option<f32> {
        self.temperature_c
    }

    pub fn humidity_pct(&self) -> Option<f32> {
        self.humidity_pct
    }
}

impl<H: HumidityDriver> Sensor for DhtSensor<H> {
    fn kind(&self) -> SensorKind {
        match self.variant {
            DhtVariant::Dht11 => SensorKind::Dht11,
            DhtVariant::Dht22 => SensorKind::Dht22,
        }
    }

    fn read(&mut self) -> Result<Values> {
        let m = self.driver.measure()?;
        self.temperature_c = Some(round_to(m.temperature_c, 1));
        self.humidity_pct = Some(round_to(m.humidity_pct, 1));
        debug!(
            "{:?}: t={:?} h={:?}",
            self.variant, self.temperature_c, self.humidity_pct
        );
        Ok(self.values())
    }

    fn values(&self) -> Values {
        values_of([self.temperature_c, self.humidity_pct])
    }

    fn values_dict(&self) -> NamedValues {
        NamedValues::zip(&FIELDS, &self.values())
    }
}
