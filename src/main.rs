//! SensorBank firmware: polling loop entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Board bring-up (ESP-IDF HAL)  |  Host simulation (sim)  │
//! │  ────────────── embedded-hal / port traits ───────────── │
//! │  Sensor adapters  →  SensorHub  →  LogSink               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! On the board the hub holds the sensors wired on this PCB (BH1750 on the
//! shared I2C bus, HC-SR04, button bank).  On the host every adapter runs
//! against `adapters::sim` with slowly drifting values.

#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use sensorbank::adapters::log_sink::LogSink;
use sensorbank::config::SensorBankConfig;
use sensorbank::sensors::hub::{SensorHub, SnapshotSink};

fn main() -> Result<()> {
    #[cfg(target_os = "espidf")]
    {
        esp_idf_sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config();
    config.validate()?;
    info!("SensorBank starting, poll every {} ms", config.poll_interval_ms);

    run(&config)
}

fn poll_forever(
    hub: &mut SensorHub<'_>,
    config: &SensorBankConfig,
    mut before_pass: impl FnMut(u32),
) -> Result<()> {
    let mut sink = LogSink::new();
    let mut pass = 0u32;
    loop {
        before_pass(pass);
        let report = hub.read_all();
        sink.publish(&report, &hub.snapshot());
        pass = pass.wrapping_add(1);
        sleep_ms(config.poll_interval_ms);
    }
}

#[cfg(target_os = "espidf")]
fn sleep_ms(ms: u32) {
    esp_idf_hal::delay::FreeRtos::delay_ms(ms);
}

#[cfg(not(target_os = "espidf"))]
fn sleep_ms(ms: u32) {
    std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
}

// ── Config loading ────────────────────────────────────────────

/// Postcard blob from NVS, defaults if absent or unusable.
#[cfg(target_os = "espidf")]
fn load_config() -> SensorBankConfig {
    use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
    use sensorbank::config::{MAX_BLOB_SIZE, NVS_CONFIG_KEY, NVS_NAMESPACE};

    let nvs = match EspDefaultNvsPartition::take()
        .and_then(|part| EspNvs::<NvsDefault>::new(part, NVS_NAMESPACE, true))
    {
        Ok(nvs) => nvs,
        Err(e) => {
            warn!("NVS unavailable ({}), using default config", e);
            return SensorBankConfig::default();
        }
    };
    let mut buf = [0u8; MAX_BLOB_SIZE];
    match nvs.get_blob(NVS_CONFIG_KEY, &mut buf) {
        Ok(blob) => SensorBankConfig::from_bytes_or_default(blob),
        Err(e) => {
            warn!("NVS config read failed ({}), using default config", e);
            SensorBankConfig::default()
        }
    }
}

/// JSON file named by `SENSORBANK_CONFIG`, defaults if unset or unusable.
#[cfg(not(target_os = "espidf"))]
fn load_config() -> SensorBankConfig {
    let Ok(path) = std::env::var("SENSORBANK_CONFIG") else {
        return SensorBankConfig::from_json_or_default(None);
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => SensorBankConfig::from_json_or_default(Some(&json)),
        Err(e) => {
            warn!("cannot read {} ({}), using default config", path, e);
            SensorBankConfig::default()
        }
    }
}

// ── Board bring-up ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn run(config: &SensorBankConfig) -> Result<()> {
    use core::cell::RefCell;

    use embedded_hal_bus::i2c::RefCellDevice;
    use esp_idf_hal::delay::Delay;
    use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, PinDriver};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_hal::units::Hertz;

    use sensorbank::adapters::esp::EspClock;
    use sensorbank::drivers::pulse::PolledPulseTimer;
    use sensorbank::pins;
    use sensorbank::sensors::{Bh1750Sensor, ButtonBank, Hcsr04};

    let p = Peripherals::take()?;

    // SAFETY: each GPIO number below is claimed exactly once (see pins.rs).
    let (sda, scl, trig, echo) = unsafe {
        (
            esp_idf_hal::gpio::AnyIOPin::new(pins::I2C_SDA_GPIO),
            esp_idf_hal::gpio::AnyIOPin::new(pins::I2C_SCL_GPIO),
            AnyOutputPin::new(pins::HCSR04_TRIGGER_GPIO),
            AnyInputPin::new(pins::HCSR04_ECHO_GPIO),
        )
    };
    let i2c_cfg = I2cConfig::new().baudrate(Hertz(pins::I2C_BAUDRATE_HZ));
    let bus = RefCell::new(I2cDriver::new(p.i2c0, sda, scl, &i2c_cfg)?);

    let mut light = Bh1750Sensor::with_address(
        RefCellDevice::new(&bus),
        Delay::new_default(),
        config.bh1750_address,
    )?;
    light.set_conversion_ms(config.bh1750_conversion_ms);

    let ranger = Hcsr04::with_timeout(
        PinDriver::output(trig)?,
        PolledPulseTimer::new(PinDriver::input(echo)?, EspClock::new()),
        Delay::new_default(),
        config.echo_timeout_us,
    )?;

    let mut buttons = Vec::new();
    for gpio in pins::BUTTON_GPIOS {
        // SAFETY: button GPIOs are not used by any other driver.
        buttons.push(PinDriver::input(unsafe { AnyInputPin::new(gpio) })?);
    }
    let buttons = ButtonBank::new(buttons)?;

    let mut hub = SensorHub::new();
    hub.add("light", Box::new(light))?;
    hub.add("range", Box::new(ranger))?;
    hub.add("buttons", Box::new(buttons))?;
    info!("board: {} sensors on hub", hub.len());

    poll_forever(&mut hub, config, |_| {})
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
fn run(config: &SensorBankConfig) -> Result<()> {
    use core::cell::RefCell;

    use embedded_hal_bus::i2c::RefCellDevice;

    use sensorbank::adapters::sim::{
        SimDelay, SimEnvironment, SimEnvironmentBus, SimHumidity, SimHumidityPin, SimI2c,
        SimOneWire, SimOneWireLine, SimPin, SimPulseTimer,
    };
    use sensorbank::sensors::ports::RomId;
    use sensorbank::sensors::{
        Bh1750Sensor, Bme280Sensor, ButtonBank, DhtSensor, DhtVariant, Ds18b20Bus, Hcsr04,
    };

    let mut delay = SimDelay::new();

    let dht_pin = SimHumidityPin::new();
    dht_pin.set_reading(21.0, 45.0);
    let dht = DhtSensor::<SimHumidity>::with_settle(
        DhtVariant::Dht22,
        dht_pin.clone(),
        &mut delay,
        config.dht_settle_ms,
    );

    let env_bus = SimEnvironmentBus::new();
    let bme =
        Bme280Sensor::<SimEnvironment>::with_address(env_bus.clone(), config.bme280_address)?;

    let i2c = SimI2c::new();
    let bus = RefCell::new(i2c.clone());
    let mut light =
        Bh1750Sensor::with_address(RefCellDevice::new(&bus), delay.clone(), config.bh1750_address)?;
    light.set_conversion_ms(config.bh1750_conversion_ms);

    let probe_a = RomId([0x28, 0x61, 0x64, 0x12, 0x3c, 0x7c, 0x2f, 0x27]);
    let probe_b = RomId([0x28, 0x4a, 0x1f, 0x07, 0xd6, 0x01, 0x3c, 0x9e]);
    let line = SimOneWireLine::with_probes(&[(probe_a, 18.0), (probe_b, 4.0)]);
    let mut probes = Ds18b20Bus::<SimOneWire, _>::new(line.clone(), delay.clone())?;
    probes.set_conversion_ms(config.ds18b20_conversion_ms);

    let button_pins = [SimPin::new(false), SimPin::new(false)];
    let buttons = ButtonBank::new(button_pins.iter().cloned())?;

    let echo = SimPulseTimer::new();
    let ranger = Hcsr04::with_timeout(
        SimPin::new(false),
        echo.clone(),
        delay.clone(),
        config.echo_timeout_us,
    )?;

    let mut hub = SensorHub::new();
    hub.add("indoor", Box::new(dht))?;
    hub.add("outdoor", Box::new(bme))?;
    hub.add("light", Box::new(light))?;
    hub.add("probes", Box::new(probes))?;
    hub.add("buttons", Box::new(buttons))?;
    hub.add("range", Box::new(ranger))?;
    info!("sim: {} sensors on hub", hub.len());

    poll_forever(&mut hub, config, |pass| {
        let drift = (pass % 20) as f32 * 0.1;
        dht_pin.set_reading(21.0 + drift, 45.0 - drift);
        env_bus.set_sample(15.0 + drift, 1013.25 - drift, 60.0);
        i2c.queue_read(config.bh1750_address, &[0x01, (pass % 256) as u8]);
        line.set_temperature(probe_a, 18.0 + drift);
        button_pins[0].set_level(pass % 4 == 0);
        // Every fifth ping finds nothing in range.
        echo.push(if pass % 5 == 4 {
            Err(sensorbank::error::ETIMEDOUT)
        } else {
            Ok(1_164 + pass % 100)
        });
    })
}
