//! Fuzz target: stored `SensorBankConfig` decoding
//!
//! Feeds arbitrary bytes to both the postcard and JSON decoders and checks:
//! - No panics on corrupt input
//! - Anything accepted also passes `validate`
//! - An accepted config survives a postcard re-encode unchanged
//!
//! cargo fuzz run fuzz_config_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use sensorbank::config::SensorBankConfig;

fn check(config: &SensorBankConfig) {
    assert!(config.validate().is_ok(), "decoder accepted invalid config");
    let bytes = config.to_bytes().expect("accepted config must re-encode");
    let again = SensorBankConfig::from_bytes(&bytes).expect("re-encoded config must decode");
    assert_eq!(&again, config);
}

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = SensorBankConfig::from_bytes(data) {
        check(&config);
    }
    if let Ok(text) = core::str::from_utf8(data) {
        if let Ok(config) = SensorBankConfig::from_json(text) {
            check(&config);
        }
    }
});
