//! BME280 pressure / temperature / humidity probe on a shared I2C bus.
//!
//! Compensation and register access belong to the external
//! [`EnvironmentDriver`].  The adapter validates the address, attaches the
//! driver, and rounds the sample: temperature and humidity to 0.1,
//! pressure (hPa) to 0.01.

use log::{debug, info};

use super::ports::EnvironmentDriver;
use super::value::{NamedValues, Values, round_to, values_of};
use super::{Sensor, SensorKind, check_address};
use crate::error::Result;

/// Factory address with SDO tied low.
pub const DEFAULT_ADDRESS: u8 = 0x76;

const FIELDS: [&str; 3] = ["t", "h", "p"];

pub struct Bme280Sensor<B> {
    driver: B,
    address: u8,
    temperature_c: Option<f32>,
    humidity_pct: Option<f32>,
    pressure_hpa: Option<f32>,
}

impl<B: EnvironmentDriver> Bme280Sensor<B> {
    /// Attach at [`DEFAULT_ADDRESS`].
    pub fn new(i2c: B::Bus) -> Result<Self> {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: B::Bus, address: u8) -> Result<Self> {
        check_address(address)?;
        let driver = B::attach(i2c, address)?;
        info!("BME280: attached at 0x{:02x}", address);
        Ok(Self {
            driver,
            address,
            temperature_c: None,
            humidity_pct: None,
            pressure_hpa: None,
        })
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn temperature_c(&self) -> Option<f32> {
        self.temperature_c
    }

    pub fn humidity_pct(&self) -> Option<f32> {
        self.humidity_pct
    }

    pub fn pressure_hpa(&self) -> Option<f32> {
        self.pressure_hpa
    }
}

impl<B: EnvironmentDriver> Sensor for Bme280Sensor<B> {
    fn kind(&self) -> SensorKind {
        SensorKind::Bme280
    }

    fn read(&mut self) -> Result<Values> {
        let m = self.driver.sample()?;
        self.temperature_c = Some(round_to(m.temperature_c, 1));
        self.pressure_hpa = Some(round_to(m.pressure_hpa, 2));
        self.humidity_pct = Some(round_to(m.humidity_pct, 1));
        debug!(
            "BME280: t={:?} h={:?} p={:?}",
            self.temperature_c, self.humidity_pct, self.pressure_hpa
        );
        Ok(self.values())
    }

    fn values(&self) -> Values {
        values_of([self.temperature_c, self.humidity_pct, self.pressure_hpa])
    }

    fn values_dict(&self) -> NamedValues {
        NamedValues::zip(&FIELDS, &self.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sim::{SimEnvironment, SimEnvironmentBus};
    use crate::error::{Error, SensorError};
    use embedded_hal::i2c::ErrorKind;
    use crate::sensors::value::Value;

    #[test]
    fn rejects_ten_bit_address() {
        let bus = SimEnvironmentBus::new();
        let r = Bme280Sensor::<SimEnvironment>::with_address(bus, 0x80);
        assert!(matches!(r, Err(Error::Config(_))));
    }

    #[test]
    fn attaches_at_default_address() {
        let bus = SimEnvironmentBus::new();
        let s = Bme280Sensor::<SimEnvironment>::new(bus.clone()).unwrap();
        assert_eq!(s.address(), 0x76);
        assert_eq!(bus.attached_address(), Some(0x76));
        assert!(s.values_dict().all_unset());
    }

    #[test]
    fn read_orders_t_h_p_and_rounds() {
        let bus = SimEnvironmentBus::new();
        let mut s = Bme280Sensor::<SimEnvironment>::new(bus.clone()).unwrap();
        bus.set_sample(22.349, 1013.2549, 48.96);
        let v = s.read().unwrap();
        let floats: Vec<f32> = v.iter().map(|x| x.unwrap().as_f32().unwrap()).collect();
        assert!((floats[0] - 22.3).abs() < 1e-4);
        assert!((floats[1] - 49.0).abs() < 1e-4);
        assert!((floats[2] - 1013.25).abs() < 1e-3);

        let dict = s.values_dict();
        let names: Vec<&str> = dict.names().collect();
        assert_eq!(names, ["t", "h", "p"]);
        assert_eq!(dict.get("p"), Some(v[2]));
        assert!(matches!(dict.get("t"), Some(Some(Value::Float(_)))));
    }

    #[test]
    fn bus_error_propagates_and_keeps_last_values() {
        let bus = SimEnvironmentBus::new();
        let mut s = Bme280Sensor::<SimEnvironment>::new(bus.clone()).unwrap();
        bus.set_sample(18.0, 1000.5, 60.0);
        let before = s.read().unwrap();

        let nack = SensorError::I2c(ErrorKind::NoAcknowledge(
            embedded_hal::i2c::NoAcknowledgeSource::Address,
        ));
        bus.fail_with(nack);
        assert_eq!(s.read(), Err(Error::Sensor(nack)));
        assert_eq!(s.values(), before);
        assert_eq!(s.values_dict().get("p"), Some(Some(Value::Float(1000.5))));
    }

    #[test]
    fn silent_bus_before_first_sample_is_no_device() {
        let bus = SimEnvironmentBus::new();
        let mut s = Bme280Sensor::<SimEnvironment>::new(bus).unwrap();
        assert_eq!(s.read(), Err(Error::Sensor(SensorError::NoDevice)));
        assert!(s.values_dict().all_unset());
    }
}
