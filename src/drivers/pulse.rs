//! Busy-polled pulse-width measurement on a plain input pin.
//!
//! Semantics follow the usual `time_pulse_us(pin, level, timeout)`:
//! if the pin is not already at `level`, first wait for it to get there,
//! then time how long it stays.  Each of the two waits is bounded by the
//! timeout independently.  Errors are `errno` codes so the HC-SR04
//! adapter can tell a timeout from anything else.

use embedded_hal::digital::InputPin;

use crate::error::{EIO, ETIMEDOUT};
use crate::sensors::ports::{MicrosClock, PulseTimer};

pub struct PolledPulseTimer<P, C> {
    pin: P,
    clock: C,
}

impl<P: InputPin, C: MicrosClock> PolledPulseTimer<P, C> {
    pub fn new(pin: P, clock: C) -> Self {
        Self { pin, clock }
    }

    fn level(&mut self) -> Result<bool, i32> {
        self.pin.is_high().map_err(|_| EIO)
    }

    /// Spin until the pin reads `level`; returns the time it did.
    fn wait_for(&mut self, level: bool, since: u64, timeout_us: u32) -> Result<u64, i32> {
        loop {
            let now = self.clock.now_us();
            if self.level()? == level {
                return Ok(now);
            }
            if now.saturating_sub(since) >= u64::from(timeout_us) {
                return Err(ETIMEDOUT);
            }
        }
    }
}

impl<P: InputPin, C: MicrosClock> PulseTimer for PolledPulseTimer<P, C> {
    fn time_pulse_us(&mut self, level: bool, timeout_us: u32) -> Result<u32, i32> {
        let start = self.clock.now_us();
        let leading = self.wait_for(level, start, timeout_us)?;
        let trailing = self.wait_for(!level, leading, timeout_us)?;
        Ok(trailing.saturating_sub(leading).min(u64::from(u32::MAX)) as u32)
    }
}
