//! Fuzz target: `BlinkConfig::from_json`
//!
//! Feeds arbitrary bytes to the config loader and verifies:
//! - No panics under arbitrary input
//! - Anything accepted also passes `validate()`
//! - An accepted config yields a period inside its own bounds
//!
//! cargo fuzz run fuzz_config

#![no_main]

use libfuzzer_sys::fuzz_target;
use smartled::config::BlinkConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = BlinkConfig::from_json(data) {
        assert!(config.validate().is_ok());
        assert!(config.bounds().contains(config.period()));
        assert!(config.duty().percent() <= 100);
    }
});
