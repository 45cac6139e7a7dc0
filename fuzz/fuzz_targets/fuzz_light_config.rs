//! Fuzz target: JSON platform entry parsing
//!
//! Feeds arbitrary bytes to `LightConfig::from_json` and verifies:
//! - No panics on malformed or hostile input
//! - A config that validates has exactly the channel count of its mode
//!
//! cargo fuzz run fuzz_light_config

#![no_main]

use libfuzzer_sys::fuzz_target;
use ledfade::config::LightConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = LightConfig::from_json(json) {
        if config.validate().is_ok() {
            assert_eq!(config.ports.len(), config.mode.channel_count());
        }
    }
});
