//! SensorHub over a realistic mix of simulated sensors.

use sensorbank::adapters::log_sink::LogSink;
use sensorbank::adapters::sim::{
    SimDelay, SimEnvironment, SimEnvironmentBus, SimHumidity, SimHumidityPin, SimPin,
    SimPulseTimer,
};
use sensorbank::error::{ETIMEDOUT, Error, SensorError};
use sensorbank::sensors::hub::SnapshotSink;
use sensorbank::sensors::value::Value;
use sensorbank::sensors::{
    Bme280Sensor, ButtonBank, DhtSensor, DhtVariant, Hcsr04, Sensor, SensorHub, SensorKind,
};

struct Rig {
    dht: SimHumidityPin,
    env: SimEnvironmentBus,
    buttons: [SimPin; 2],
    echo: SimPulseTimer,
    delay: SimDelay,
}

fn rig() -> (SensorHub<'static>, Rig) {
    let rig = Rig {
        dht: SimHumidityPin::new(),
        env: SimEnvironmentBus::new(),
        buttons: [SimPin::new(false), SimPin::new(false)],
        echo: SimPulseTimer::new(),
        delay: SimDelay::new(),
    };
    let mut delay = rig.delay.clone();

    let mut hub = SensorHub::new();
    hub.add(
        "indoor",
        Box::new(DhtSensor::<SimHumidity>::new(DhtVariant::Dht22, rig.dht.clone(), &mut delay)),
    )
    .unwrap();
    hub.add(
        "outdoor",
        Box::new(Bme280Sensor::<SimEnvironment>::new(rig.env.clone()).unwrap()),
    )
    .unwrap();
    hub.add(
        "buttons",
        Box::new(ButtonBank::new(rig.buttons.iter().cloned()).unwrap()),
    )
    .unwrap();
    hub.add(
        "range",
        Box::new(Hcsr04::new(SimPin::new(false), rig.echo.clone(), delay).unwrap()),
    )
    .unwrap();
    (hub, rig)
}

#[test]
fn hub_keeps_insertion_order() {
    let (hub, _rig) = rig();
    let labels: Vec<&str> = hub.labels().collect();
    assert_eq!(labels, ["indoor", "outdoor", "buttons", "range"]);
    assert_eq!(hub.get("outdoor").map(|s| s.kind()), Some(SensorKind::Bme280));
}

#[test]
fn snapshot_before_any_read_is_null_except_button_baseline() {
    let (hub, _rig) = rig();
    let json = hub.snapshot().to_json().unwrap();
    assert_eq!(
        json,
        concat!(
            r#"{"indoor":{"t":null,"h":null},"#,
            r#""outdoor":{"t":null,"h":null,"p":null},"#,
            r#""buttons":{"b0":false,"_b0":false,"b1":false,"_b1":false},"#,
            r#""range":{"d":null}}"#
        )
    );
}

#[test]
fn out_of_range_ping_does_not_disturb_other_sensors() {
    let (mut hub, rig) = rig();
    rig.dht.set_reading(22.0, 50.0);
    rig.env.set_sample(10.0, 1000.0, 70.0);
    rig.echo.push(Err(ETIMEDOUT));

    let report = hub.read_all();
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(
        failures,
        vec![("range", Error::Sensor(SensorError::OutOfRange))]
    );

    let snap = hub.snapshot();
    assert_eq!(snap.get("indoor").unwrap().get("t"), Some(Some(Value::Float(22.0))));
    assert_eq!(snap.get("outdoor").unwrap().get("p"), Some(Some(Value::Float(1000.0))));
    assert_eq!(snap.get("range").unwrap().get("d"), Some(None));
    assert_eq!(hub.stats("range").unwrap().failures, 1);
    assert_eq!(hub.stats("indoor").unwrap().failures, 0);
}

#[test]
fn failed_sensor_retains_previous_values() {
    let (mut hub, rig) = rig();
    rig.dht.set_reading(18.0, 30.0);
    rig.env.set_sample(5.0, 990.0, 80.0);
    rig.echo.push(Ok(582));
    assert!(hub.read_all().all_ok());

    rig.dht.fail_with(SensorError::Timeout);
    rig.echo.push(Ok(1_164));
    let report = hub.read_all();
    assert!(!report.all_ok());

    let snap = hub.snapshot();
    assert_eq!(snap.get("indoor").unwrap().get("t"), Some(Some(Value::Float(18.0))));
    let d = snap.get("range").unwrap().get("d").unwrap().unwrap();
    assert_eq!(d, Value::Float(20.0));
}

#[test]
fn button_edge_visible_through_hub() {
    let (mut hub, rig) = rig();
    rig.dht.set_reading(20.0, 40.0);
    rig.env.set_sample(20.0, 1010.0, 40.0);
    rig.echo.push(Ok(600));
    rig.echo.push(Ok(600));

    hub.read_all();
    rig.buttons[1].set_level(true);
    hub.read_all();

    let snap = hub.snapshot();
    let b = snap.get("buttons").unwrap();
    assert_eq!(b.get("b1"), Some(Some(Value::Bool(true))));
    assert_eq!(b.get("_b1"), Some(Some(Value::Bool(false))));
}

#[test]
fn log_sink_sees_every_pass() {
    let (mut hub, rig) = rig();
    rig.dht.set_reading(20.0, 40.0);
    let mut sink = LogSink::new();
    for _ in 0..3 {
        let report = hub.read_all();
        sink.publish(&report, &hub.snapshot());
    }
    assert_eq!(sink.passes(), 3);
    assert!(rig.delay.elapsed_ms() >= 1000);
}
