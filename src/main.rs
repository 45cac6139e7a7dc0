//! LedFade firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                Adapters (outer ring)                 │
//! │                                                      │
//! │   LedcGpio / LedcChannel        MonotonicTimer       │
//! │   (GpioPort + PwmChannel)       (FadeTimer)          │
//! │                                                      │
//! │   ─────────── Port Trait Boundary ───────────        │
//! │                                                      │
//! │   ┌──────────────────────────────────────────┐       │
//! │   │   LedController (fade logic)             │       │
//! │   │   LightEntity   (host light contract)    │       │
//! │   └──────────────────────────────────────────┘       │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Registers one light from the built-in platform entry and runs a short
//! fade sequence on it.
#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::info;

use ledfade::adapters::ledc::LedcGpio;
use ledfade::adapters::time::MonotonicTimer;
use ledfade::{Light, TurnOnOptions, setup_from_json};

/// Platform entry for the on-board RGB LED.
const PLATFORM_CONFIG: &str = r#"{
    "name": "Status LED",
    "mode": "rgb",
    "ports": [25, 26, 27]
}"#;

const DEMO_COLOURS: [[u8; 3]; 4] = [
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 255, 255],
];

const HOLD: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  LedFade v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Register the light ─────────────────────────────────
    let mut gpio = LedcGpio::new();
    let light = setup_from_json(PLATFORM_CONFIG, &mut gpio, MonotonicTimer::new())?;
    info!(
        "Light \"{}\" ready (features={:#x})",
        light.name(),
        light.supported_features().bits()
    );

    // ── 3. Demo sequence ──────────────────────────────────────
    light.turn_on(TurnOnOptions::default())?;
    thread::sleep(HOLD);

    for colour in DEMO_COLOURS {
        light.turn_on(TurnOnOptions::default().with_rgb_color(colour))?;
        info!("colour {:?} brightness {}", light.rgb_color(), light.brightness());
        thread::sleep(HOLD);
    }

    light.turn_on(TurnOnOptions::default().with_brightness(32))?;
    thread::sleep(HOLD);

    light.turn_off()?;
    light.shutdown();
    info!("Demo finished");
    Ok(())
}
