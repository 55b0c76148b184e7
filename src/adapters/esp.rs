//! ESP-IDF platform glue.
//!
//! The HAL's pin and I2C drivers already implement the `embedded-hal`
//! traits; the only platform piece the adapters still need is a
//! microsecond clock for echo timing.

use crate::sensors::ports::MicrosClock;

/// `esp_timer` based monotonic clock (µs since boot).
#[derive(Debug, Clone, Copy, Default)]
pub struct EspClock;

impl EspClock {
    pub fn new() -> Self {
        Self
    }
}

impl MicrosClock for EspClock {
    fn now_us(&mut self) -> u64 {
        // SAFETY: esp_timer_get_time has no preconditions once the IDF is up.
        let t = unsafe { esp_idf_sys::esp_timer_get_time() };
        t.max(0) as u64
    }
}
