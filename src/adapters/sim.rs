//! In-memory hardware for host builds and tests.
//!
//! Every type here is a cheap cloneable handle onto shared state, so a test
//! can hand one clone to an adapter and keep another to inject levels,
//! queue bus replies, or inspect what the adapter did.  Single-threaded
//! only (`Rc<RefCell<_>>`), matching the adapters' own model.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::i2c::{self, I2c, Operation};

use crate::error::{ETIMEDOUT, Error, Result, SensorError};
use crate::sensors::ports::{
    EnvironmentDriver, EnvironmentMeasurement, HumidityDriver, HumidityMeasurement, MAX_PROBES,
    MicrosClock, OneWireTemperatureBus, PulseTimer, RomId,
};

/// Entries kept by the pin and bus transfer logs; older ones are dropped.
pub const LOG_DEPTH: usize = 64;

/// Bounded transfer log: a simulated part can sit in an endless poll loop.
type Log<T> = heapless::Deque<T, LOG_DEPTH>;

fn record<T>(log: &mut Log<T>, entry: T) {
    if log.is_full() {
        let _ = log.pop_front();
    }
    let _ = log.push_back(entry);
}

// ───────────────────────────────────────────────────────────────
// GPIO
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct PinState {
    level: bool,
    failing: bool,
    history: Log<bool>,
}

/// Digital pin usable as input or output.
#[derive(Debug, Clone, Default)]
pub struct SimPin(Rc<RefCell<PinState>>);

impl SimPin {
    pub fn new(level: bool) -> Self {
        Self(Rc::new(RefCell::new(PinState {
            level,
            ..PinState::default()
        })))
    }

    /// Drive the level seen by readers.
    pub fn set_level(&self, level: bool) {
        self.0.borrow_mut().level = level;
    }

    pub fn level(&self) -> bool {
        self.0.borrow().level
    }

    /// Make every subsequent access fail until cleared.
    pub fn fail(&self, failing: bool) {
        self.0.borrow_mut().failing = failing;
    }

    /// Last [`LOG_DEPTH`] levels written through `OutputPin`, oldest first.
    pub fn history(&self) -> Vec<bool> {
        self.0.borrow().history.iter().copied().collect()
    }

    fn write(&mut self, level: bool) -> core::result::Result<(), digital::ErrorKind> {
        let mut s = self.0.borrow_mut();
        if s.failing {
            return Err(digital::ErrorKind::Other);
        }
        s.level = level;
        record(&mut s.history, level);
        Ok(())
    }
}

impl digital::ErrorType for SimPin {
    type Error = digital::ErrorKind;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        let s = self.0.borrow();
        if s.failing {
            return Err(digital::ErrorKind::Other);
        }
        Ok(s.level)
    }

    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        self.is_high().map(|h| !h)
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.write(true)
    }
}

// ───────────────────────────────────────────────────────────────
// Delay and clock
// ───────────────────────────────────────────────────────────────

/// Delay that returns immediately and accumulates the requested time.
#[derive(Debug, Clone, Default)]
pub struct SimDelay(Rc<Cell<u64>>);

impl SimDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_ns(&self) -> u64 {
        self.0.get()
    }

    pub fn elapsed_us(&self) -> u64 {
        self.0.get() / 1_000
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.0.get() / 1_000_000
    }

    fn add(&self, ns: u64) {
        self.0.set(self.0.get().saturating_add(ns));
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.add(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.add(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.add(u64::from(ms) * 1_000_000);
    }
}

/// Microsecond clock that advances by a fixed step on every reading.
#[derive(Debug, Clone)]
pub struct SimClock {
    now: Rc<Cell<u64>>,
    step_us: u64,
}

impl SimClock {
    pub fn new(step_us: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(0)),
            step_us,
        }
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }
}

impl MicrosClock for SimClock {
    fn now_us(&mut self) -> u64 {
        let t = self.now.get();
        self.now.set(t + self.step_us);
        t
    }
}

// ───────────────────────────────────────────────────────────────
// I2C bus
// ───────────────────────────────────────────────────────────────

/// One recorded bus transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cOp {
    Write(u8, Vec<u8>),
    Read(u8, usize),
}

#[derive(Debug, Default)]
struct BusState {
    ops: Log<I2cOp>,
    replies: VecDeque<(u8, Vec<u8>)>,
    fail_next: Option<i2c::ErrorKind>,
}

/// I2C bus with scripted read replies and a transfer log.
#[derive(Debug, Clone, Default)]
pub struct SimI2c(Rc<RefCell<BusState>>);

impl SimI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes the next read from `address` returns.  Unscripted reads return zeros.
    pub fn queue_read(&self, address: u8, bytes: &[u8]) {
        self.0
            .borrow_mut()
            .replies
            .push_back((address, bytes.to_vec()));
    }

    /// Fail the next transaction with `kind`.
    pub fn fail_next(&self, kind: i2c::ErrorKind) {
        self.0.borrow_mut().fail_next = Some(kind);
    }

    /// Last [`LOG_DEPTH`] transfers, oldest first.
    pub fn ops(&self) -> Vec<I2cOp> {
        self.0.borrow().ops.iter().cloned().collect()
    }

    pub fn clear_ops(&self) {
        self.0.borrow_mut().ops.clear();
    }
}

impl i2c::ErrorType for SimI2c {
    type Error = i2c::ErrorKind;
}

impl I2c for SimI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> core::result::Result<(), Self::Error> {
        let mut s = self.0.borrow_mut();
        if let Some(kind) = s.fail_next.take() {
            return Err(kind);
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => record(&mut s.ops, I2cOp::Write(address, bytes.to_vec())),
                Operation::Read(buf) => {
                    let pos = s.replies.iter().position(|(a, _)| *a == address);
                    let reply = pos.and_then(|i| s.replies.remove(i));
                    buf.fill(0);
                    if let Some((_, bytes)) = reply {
                        let n = bytes.len().min(buf.len());
                        buf[..n].copy_from_slice(&bytes[..n]);
                    }
                    record(&mut s.ops, I2cOp::Read(address, buf.len()));
                }
            }
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Humidity driver (DHT)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct HumidityLine {
    reading: Option<HumidityMeasurement>,
    failure: Option<SensorError>,
    handshakes: u32,
}

/// Data line of a simulated DHT part.
#[derive(Debug, Clone, Default)]
pub struct SimHumidityPin(Rc<RefCell<HumidityLine>>);

impl SimHumidityPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the next handshakes report.  Clears any injected failure.
    pub fn set_reading(&self, temperature_c: f32, humidity_pct: f32) {
        let mut line = self.0.borrow_mut();
        line.reading = Some(HumidityMeasurement {
            temperature_c,
            humidity_pct,
        });
        line.failure = None;
    }

    /// Fail handshakes with `err` until the next `set_reading`.
    pub fn fail_with(&self, err: SensorError) {
        self.0.borrow_mut().failure = Some(err);
    }

    pub fn handshakes(&self) -> u32 {
        self.0.borrow().handshakes
    }
}

/// Humidity driver answering from a [`SimHumidityPin`].
#[derive(Debug)]
pub struct SimHumidity {
    line: SimHumidityPin,
}

impl HumidityDriver for SimHumidity {
    type Pin = SimHumidityPin;

    fn attach(pin: SimHumidityPin) -> Self {
        Self { line: pin }
    }

    fn measure(&mut self) -> Result<HumidityMeasurement> {
        let mut line = self.line.0.borrow_mut();
        line.handshakes += 1;
        if let Some(err) = line.failure {
            return Err(err.into());
        }
        // A silent line is what a missing sensor looks like.
        line.reading.ok_or(Error::Sensor(SensorError::Timeout))
    }
}

// ───────────────────────────────────────────────────────────────
// Environment driver (BME280)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct EnvironmentState {
    address: Option<u8>,
    sample: Option<EnvironmentMeasurement>,
    failure: Option<SensorError>,
}

/// Bus handle a simulated BME280 sits on.
#[derive(Debug, Clone, Default)]
pub struct SimEnvironmentBus(Rc<RefCell<EnvironmentState>>);

impl SimEnvironmentBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments follow the driver's (temperature, pressure, humidity) order.
    pub fn set_sample(&self, temperature_c: f32, pressure_hpa: f32, humidity_pct: f32) {
        let mut s = self.0.borrow_mut();
        s.sample = Some(EnvironmentMeasurement {
            temperature_c,
            pressure_hpa,
            humidity_pct,
        });
        s.failure = None;
    }

    pub fn fail_with(&self, err: SensorError) {
        self.0.borrow_mut().failure = Some(err);
    }

    /// Address the driver attached at, if any.
    pub fn attached_address(&self) -> Option<u8> {
        self.0.borrow().address
    }
}

#[derive(Debug)]
pub struct SimEnvironment {
    bus: SimEnvironmentBus,
}

impl EnvironmentDriver for SimEnvironment {
    type Bus = SimEnvironmentBus;

    fn attach(i2c: SimEnvironmentBus, address: u8) -> Result<Self> {
        i2c.0.borrow_mut().address = Some(address);
        Ok(Self { bus: i2c })
    }

    fn sample(&mut self) -> Result<EnvironmentMeasurement> {
        let s = self.bus.0.borrow();
        if let Some(err) = s.failure {
            return Err(err.into());
        }
        s.sample.ok_or(Error::Sensor(SensorError::NoDevice))
    }
}

// ───────────────────────────────────────────────────────────────
// One-wire bus (DS18X20)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct OneWireState {
    probes: Vec<(RomId, f32)>,
    failing: Vec<RomId>,
    conversions: u32,
}

/// One-wire line with a fixed set of probes.
#[derive(Debug, Clone, Default)]
pub struct SimOneWireLine(Rc<RefCell<OneWireState>>);

impl SimOneWireLine {
    /// Probes in bus search order with their initial temperatures.
    pub fn with_probes(probes: &[(RomId, f32)]) -> Self {
        Self(Rc::new(RefCell::new(OneWireState {
            probes: probes.to_vec(),
            ..OneWireState::default()
        })))
    }

    pub fn set_temperature(&self, rom: RomId, celsius: f32) {
        let mut s = self.0.borrow_mut();
        if let Some(p) = s.probes.iter_mut().find(|(r, _)| *r == rom) {
            p.1 = celsius;
        }
    }

    /// Make reads of `rom` time out.
    pub fn fail_probe(&self, rom: RomId) {
        self.0.borrow_mut().failing.push(rom);
    }

    pub fn conversions(&self) -> u32 {
        self.0.borrow().conversions
    }
}

#[derive(Debug)]
pub struct SimOneWire {
    line: SimOneWireLine,
}

impl OneWireTemperatureBus for SimOneWire {
    type Pin = SimOneWireLine;

    fn attach(pin: SimOneWireLine) -> Result<Self> {
        Ok(Self { line: pin })
    }

    fn scan(&mut self) -> Result<heapless::Vec<RomId, MAX_PROBES>> {
        Ok(self
            .line
            .0
            .borrow()
            .probes
            .iter()
            .take(MAX_PROBES)
            .map(|(rom, _)| *rom)
            .collect())
    }

    fn convert_all(&mut self) -> Result<()> {
        self.line.0.borrow_mut().conversions += 1;
        Ok(())
    }

    fn read_temperature(&mut self, rom: &RomId) -> Result<f32> {
        let s = self.line.0.borrow();
        if s.failing.contains(rom) {
            return Err(SensorError::Timeout.into());
        }
        s.probes
            .iter()
            .find(|(r, _)| r == rom)
            .map(|(_, t)| *t)
            .ok_or(Error::Sensor(SensorError::NoDevice))
    }
}

// ───────────────────────────────────────────────────────────────
// Echo pulse timer (HC-SR04)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct PulseState {
    script: VecDeque<core::result::Result<u32, i32>>,
    last_timeout: Option<u32>,
}

/// Pulse timer replaying scripted results; times out once the script is empty.
#[derive(Debug, Clone, Default)]
pub struct SimPulseTimer(Rc<RefCell<PulseState>>);

impl SimPulseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, result: core::result::Result<u32, i32>) {
        self.0.borrow_mut().script.push_back(result);
    }

    /// Timeout passed on the most recent call.
    pub fn last_timeout(&self) -> Option<u32> {
        self.0.borrow().last_timeout
    }
}

impl PulseTimer for SimPulseTimer {
    fn time_pulse_us(&mut self, _level: bool, timeout_us: u32) -> core::result::Result<u32, i32> {
        let mut s = self.0.borrow_mut();
        s.last_timeout = Some(timeout_us);
        s.script.pop_front().unwrap_or(Err(ETIMEDOUT))
    }
}
