//! LedFade library.
//!
//! Fading PWM LED lights (one channel or three RGB channels) behind the
//! host automation framework's light contract. All ESP-IDF-specific code
//! is guarded by `#[cfg(target_os = "espidf")]` within each module, so
//! the crate builds and tests on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod platform;

pub use app::controller::{FadeOutcome, LedController, LightState};
pub use app::entity::{Light, LightEntity, SupportedFeatures, TurnOnOptions};
pub use config::{LightConfig, LightMode};
pub use error::{ConfigError, Error, HardwareError, Result};
pub use platform::{setup_from_json, setup_platform};
