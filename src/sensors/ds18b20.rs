//! DS18B20 probes sharing one one-wire data line.
//!
//! Probes are discovered once at construction and keep that order for the
//! life of the adapter; slot `i` in every read is always the `i`-th ROM
//! found.  Hot-plugged probes are not picked up.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use super::ports::{MAX_PROBES, OneWireTemperatureBus, RomId};
use super::value::{NamedValues, Values, indexed_name, round_to, values_of};
use super::{Sensor, SensorKind};
use crate::error::Result;

/// 12-bit conversion worst case.
pub const CONVERSION_MS: u32 = 750;

pub struct Ds18b20Bus<W, D> {
    bus: W,
    delay: D,
    conversion_ms: u32,
    roms: heapless::Vec<RomId, MAX_PROBES>,
    temps: heapless::Vec<Option<f32>, MAX_PROBES>,
}

impl<W: OneWireTemperatureBus, D: DelayNs> Ds18b20Bus<W, D> {
    /// Attach to the bus on `pin` and enumerate probes.
    pub fn new(pin: W::Pin, delay: D) -> Result<Self> {
        let mut bus = W::attach(pin)?;
        let roms = bus.scan()?;
        if roms.is_empty() {
            warn!("DS18B20: no probes found on bus");
        }
        info!("DS18B20: {} probe(s)", roms.len());
        for (i, rom) in roms.iter().enumerate() {
            debug!("DS18B20: t{} = {}", i, rom);
        }
        let temps = roms.iter().map(|_| None).collect();
        Ok(Self {
            bus,
            delay,
            conversion_ms: CONVERSION_MS,
            roms,
            temps,
        })
    }

    /// Override the conversion wait (e.g. lower resolution parts).
    pub fn set_conversion_ms(&mut self, ms: u32) {
        self.conversion_ms = ms;
    }

    /// Probe ROM ids in discovery order.
    pub fn roms(&self) -> &[RomId] {
        &self.roms
    }

    pub fn probe_count(&self) -> usize {
        self.roms.len()
    }

    pub fn temperatures(&self) -> &[Option<f32>] {
        &self.temps
    }
}

impl<W: OneWireTemperatureBus, D: DelayNs> Sensor for Ds18b20Bus<W, D> {
    fn kind(&self) -> SensorKind {
        SensorKind::Ds18b20
    }

    fn read(&mut self) -> Result<Values> {
        self.bus.convert_all()?;
        self.delay.delay_ms(self.conversion_ms);

        // Read every probe before committing so a mid-bus failure leaves the
        // previous set intact.
        let mut fresh: heapless::Vec<Option<f32>, MAX_PROBES> = heapless::Vec::new();
        for rom in &self.roms {
            let t = self.bus.read_temperature(rom)?;
            let _ = fresh.push(Some(round_to(t, 1)));
        }
        self.temps = fresh;
        debug!("DS18B20: {:?}", self.temps.as_slice());
        Ok(self.values())
    }

    fn values(&self) -> Values {
        values_of(self.temps.iter().copied())
    }

    fn values_dict(&self) -> NamedValues {
        let mut named = NamedValues::new();
        for (i, t) in self.values().iter().enumerate() {
            named.insert(&indexed_name("t", i), *t);
        }
        named
    }
}
