//! Two I2C clients on one physical bus through `embedded-hal-bus`
//! `RefCellDevice` handles, the way the firmware wires them.

use core::cell::RefCell;

use embedded_hal_bus::i2c::RefCellDevice;
use sensorbank::adapters::sim::{I2cOp, SimDelay, SimI2c};
use sensorbank::sensors::bh1750::Bh1750Sensor;
use sensorbank::sensors::value::Value;
use sensorbank::sensors::{Sensor, SensorHub};

#[test]
fn two_light_sensors_share_one_bus() {
    let wire = SimI2c::new();
    let bus = RefCell::new(wire.clone());

    let mut low = Bh1750Sensor::new(RefCellDevice::new(&bus), SimDelay::new()).unwrap();
    let mut high =
        Bh1750Sensor::with_address(RefCellDevice::new(&bus), SimDelay::new(), 0x5c).unwrap();

    wire.queue_read(0x5c, &[0x00, 0x10]);
    wire.queue_read(0x23, &[0x01, 0x00]);

    low.read().unwrap();
    high.read().unwrap();
    assert_eq!(low.lux(), Some(213));
    assert_eq!(high.lux(), Some((0x10u32 << 16) / 78_642));

    let ops = wire.ops();
    assert_eq!(ops.len(), 10);
    assert!(ops[..5].iter().all(|op| matches!(op, I2cOp::Write(0x23, _) | I2cOp::Read(0x23, _))));
    assert!(ops[5..].iter().all(|op| matches!(op, I2cOp::Write(0x5c, _) | I2cOp::Read(0x5c, _))));
}

#[test]
fn shared_bus_sensors_live_in_one_hub() {
    let wire = SimI2c::new();
    let bus = RefCell::new(wire.clone());

    let mut hub = SensorHub::new();
    hub.add(
        "lux-a",
        Box::new(Bh1750Sensor::new(RefCellDevice::new(&bus), SimDelay::new()).unwrap()),
    )
    .unwrap();
    hub.add(
        "lux-b",
        Box::new(
            Bh1750Sensor::with_address(RefCellDevice::new(&bus), SimDelay::new(), 0x5c).unwrap(),
        ),
    )
    .unwrap();

    wire.queue_read(0x23, &[0x02, 0x00]);
    wire.queue_read(0x5c, &[0x01, 0x00]);
    assert!(hub.read_all().all_ok());

    let snap = hub.snapshot();
    assert_eq!(snap.get("lux-a").unwrap().get("lux"), Some(Some(Value::Int(426))));
    assert_eq!(snap.get("lux-b").unwrap().get("lux"), Some(Some(Value::Int(213))));
}
