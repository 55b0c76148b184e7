//! Contract every adapter honours through the `Sensor` trait:
//! nothing before the first read, list and named views agree after it.

use sensorbank::adapters::sim::{
    SimDelay, SimEnvironment, SimEnvironmentBus, SimHumidity, SimHumidityPin, SimI2c, SimOneWire,
    SimOneWireLine, SimPin, SimPulseTimer,
};
use sensorbank::sensors::ports::RomId;
use sensorbank::sensors::value::Value;
use sensorbank::sensors::{
    Bh1750Sensor, Bme280Sensor, ButtonBank, DhtSensor, DhtVariant, Ds18b20Bus, Hcsr04, Sensor,
    SensorKind,
};

/// Every adapter kind, wired to hardware primed for one good read.
fn all_sensors() -> Vec<Box<dyn Sensor>> {
    let mut delay = SimDelay::new();

    let dht11_pin = SimHumidityPin::new();
    dht11_pin.set_reading(19.04, 61.26);
    let dht22_pin = SimHumidityPin::new();
    dht22_pin.set_reading(-2.35, 88.88);

    let env = SimEnvironmentBus::new();
    env.set_sample(23.456, 1009.876, 40.04);

    let i2c = SimI2c::new();
    i2c.queue_read(0x23, &[0x12, 0x34]);

    let line = SimOneWireLine::with_probes(&[
        (RomId([0x28, 1, 0, 0, 0, 0, 0, 0]), 20.25),
        (RomId([0x28, 2, 0, 0, 0, 0, 0, 0]), 21.75),
    ]);

    let echo = SimPulseTimer::new();
    echo.push(Ok(1_746));

    let mut sensors: Vec<Box<dyn Sensor>> = Vec::new();
    sensors.push(Box::new(DhtSensor::<SimHumidity>::new(DhtVariant::Dht11, dht11_pin, &mut delay)));
    sensors.push(Box::new(DhtSensor::<SimHumidity>::new(DhtVariant::Dht22, dht22_pin, &mut delay)));
    sensors.push(Box::new(Bme280Sensor::<SimEnvironment>::new(env).unwrap()));
    sensors.push(Box::new(Bh1750Sensor::new(i2c, delay.clone()).unwrap()));
    sensors.push(Box::new(Ds18b20Bus::<SimOneWire, _>::new(line, delay.clone()).unwrap()));
    sensors.push(Box::new(ButtonBank::new([SimPin::new(true), SimPin::new(false)]).unwrap()));
    sensors.push(Box::new(Hcsr04::new(SimPin::new(false), echo, delay).unwrap()));
    sensors
}

fn decimals_ok(v: f32, decimals: i32) -> bool {
    let scaled = v * 10f32.powi(decimals);
    (scaled - scaled.round()).abs() < 1e-2
}

#[test]
fn no_reading_before_first_read() {
    for s in all_sensors() {
        if s.kind() == SensorKind::Buttons {
            // The bank samples a baseline at construction.
            continue;
        }
        assert!(s.values().iter().all(Option::is_none), "{}", s.kind());
        assert!(s.values_dict().all_unset(), "{}", s.kind());
    }
}

#[test]
fn list_and_named_views_agree_after_read() {
    for mut s in all_sensors() {
        let returned = s.read().unwrap_or_else(|e| panic!("{}: {}", s.kind(), e));
        assert_eq!(returned, s.values(), "{}", s.kind());

        let dict = s.values_dict();
        let values = s.values();
        match s.kind() {
            SensorKind::Buttons => {
                // Current states sit at even positions, previous at odd.
                let current: Vec<_> = dict
                    .iter()
                    .filter(|(n, _)| !n.starts_with('_'))
                    .map(|(_, v)| v)
                    .collect();
                assert_eq!(current, values.to_vec());
                assert_eq!(dict.len(), values.len() * 2);
            }
            _ => {
                let named: Vec<_> = dict.iter().map(|(_, v)| v).collect();
                assert_eq!(named, values.to_vec(), "{}", s.kind());
            }
        }
    }
}

#[test]
fn rounding_matches_documented_precision() {
    for mut s in all_sensors() {
        s.read().unwrap();
        let dict = s.values_dict();
        for (name, value) in dict.iter() {
            match (s.kind(), name, value) {
                (SensorKind::Bme280, "p", Some(Value::Float(p))) => assert!(decimals_ok(p, 2)),
                (SensorKind::Bh1750, "lux", v) => assert!(matches!(v, Some(Value::Int(_)))),
                (SensorKind::Buttons, _, v) => assert!(matches!(v, Some(Value::Bool(_)))),
                (kind, _, Some(Value::Float(x))) => {
                    assert!(decimals_ok(x, 1), "{kind} {name}={x}");
                }
                (kind, _, other) => panic!("{kind} {name} unexpected {other:?}"),
            }
        }
    }
}

#[test]
fn field_names_per_kind() {
    for s in all_sensors() {
        let names: Vec<String> = s.values_dict().names().map(str::to_owned).collect();
        let expected: &[&str] = match s.kind() {
            SensorKind::Dht11 | SensorKind::Dht22 => &["t", "h"],
            SensorKind::Bme280 => &["t", "h", "p"],
            SensorKind::Bh1750 => &["lux"],
            SensorKind::Ds18b20 => &["t0", "t1"],
            SensorKind::Buttons => &["b0", "_b0", "b1", "_b1"],
            SensorKind::Hcsr04 => &["d"],
        };
        assert_eq!(names, expected, "{}", s.kind());
    }
}
