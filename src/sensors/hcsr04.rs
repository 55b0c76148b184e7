//! HC-SR04 ultrasonic ranger.
//!
//! A 10 µs trigger pulse starts a ping; the echo line then stays high for
//! the round-trip time of flight.  Sound covers 1 cm in ~29.1 µs, so the
//! one-way distance is `pulse / 2 / 29.1` cm.  The integer millimetre form
//! `pulse * 100 / 582` avoids floats entirely.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{debug, info};

use super::ports::PulseTimer;
use super::value::{NamedValues, Values, round_to, values_of};
use super::{Sensor, SensorKind};
use crate::error::{ETIMEDOUT, Error, Result, SensorError, gpio_error};

/// ~8.6 m round trip; well past the part's 4 m range.
pub const DEFAULT_ECHO_TIMEOUT_US: u32 = 500_000;

const TRIGGER_SETTLE_US: u32 = 5;
const TRIGGER_PULSE_US: u32 = 10;

const FIELDS: [&str; 1] = ["d"];

/// Round-trip pulse width to whole millimetres.
pub fn pulse_to_mm(pulse_us: u32) -> u32 {
    (u64::from(pulse_us) * 100 / 582) as u32
}

/// Round-trip pulse width to centimetres.
pub fn pulse_to_cm(pulse_us: f32) -> f32 {
    (pulse_us / 2.0) / 29.1
}

pub struct Hcsr04<T, E, D> {
    trigger: T,
    echo: E,
    delay: D,
    echo_timeout_us: u32,
    pulse_time_us: Option<u32>,
}

impl<T: OutputPin, E: PulseTimer, D: DelayNs> Hcsr04<T, E, D> {
    pub fn new(trigger: T, echo: E, delay: D) -> Result<Self> {
        Self::with_timeout(trigger, echo, delay, DEFAULT_ECHO_TIMEOUT_US)
    }

    /// Bind the pins and park the trigger low.
    pub fn with_timeout(mut trigger: T, echo: E, delay: D, echo_timeout_us: u32) -> Result<Self> {
        trigger.set_low().map_err(gpio_error)?;
        info!("HC-SR04: echo timeout {} us", echo_timeout_us);
        Ok(Self {
            trigger,
            echo,
            delay,
            echo_timeout_us,
            pulse_time_us: None,
        })
    }

    pub fn echo_timeout_us(&self) -> u32 {
        self.echo_timeout_us
    }

    /// Last successful round-trip time.
    pub fn pulse_time_us(&self) -> Option<u32> {
        self.pulse_time_us
    }

    /// `None` until a read succeeds, or when the last echo measured 0 µs.
    pub fn distance_mm(&self) -> Option<u32> {
        self.pulse().map(pulse_to_mm)
    }

    /// `None` until a read succeeds, or when the last echo measured 0 µs.
    pub fn distance_cm(&self) -> Option<f32> {
        self.pulse().map(|p| pulse_to_cm(p as f32))
    }

    fn pulse(&self) -> Option<u32> {
        self.pulse_time_us.filter(|p| *p != 0)
    }

    fn send_pulse_and_wait(&mut self) -> Result<u32> {
        self.trigger.set_low().map_err(gpio_error)?;
        self.delay.delay_us(TRIGGER_SETTLE_US);
        self.trigger.set_high().map_err(gpio_error)?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low().map_err(gpio_error)?;

        match self.echo.time_pulse_us(true, self.echo_timeout_us) {
            Ok(pulse) => Ok(pulse),
            Err(ETIMEDOUT) => Err(Error::Sensor(SensorError::OutOfRange)),
            Err(code) => Err(Error::Sensor(SensorError::Io(code))),
        }
    }
}

impl<T: OutputPin, E: PulseTimer, D: DelayNs> Sensor for Hcsr04<T, E, D> {
    fn kind(&self) -> SensorKind {
        SensorKind::Hcsr04
    }

    fn read(&mut self) -> Result<Values> {
        let pulse = self.send_pulse_and_wait()?;
        self.pulse_time_us = Some(pulse);
        debug!("HC-SR04: pulse={} us d={:?} mm", pulse, self.distance_mm());
        Ok(self.values())
    }

    fn values(&self) -> Values {
        values_of([self.distance_cm().map(|cm| round_to(cm, 1))])
    }

    fn values_dict(&self) -> NamedValues {
        NamedValues::zip(&FIELDS, &self.values())
    }
}
