//! Host-facing light entity contract.
//!
//! The automation host drives lights through the synchronous [`Light`]
//! trait. [`LightEntity`] adapts an async [`LedController`] to it by
//! blocking the calling thread until the fade has finished.

use core::ops::BitOr;

use futures_lite::future::block_on;

use crate::config::LightMode;
use crate::error::Result;

use super::controller::LedController;
use super::ports::{FadeTimer, PwmChannel};

// ───────────────────────────────────────────────────────────────
// Feature flags
// ───────────────────────────────────────────────────────────────

/// Capability bits advertised to the host (host's own bit values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SupportedFeatures(u32);

impl SupportedFeatures {
    pub const BRIGHTNESS: Self = Self(1);
    pub const RGB_COLOR: Self = Self(16);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Brightness always; colour only for RGB lights.
    pub const fn for_mode(mode: LightMode) -> Self {
        match mode {
            LightMode::Single => Self::BRIGHTNESS,
            LightMode::Rgb => Self(Self::BRIGHTNESS.0 | Self::RGB_COLOR.0),
        }
    }
}

impl BitOr for SupportedFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// ───────────────────────────────────────────────────────────────
// Turn-on options
// ───────────────────────────────────────────────────────────────

/// Optional attributes of a turn-on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnOnOptions {
    /// Target brightness 0–255; 255 when absent.
    pub brightness: Option<u8>,
    /// Target colour; ignored by single-channel lights, last colour when absent.
    pub rgb_color: Option<[u8; 3]>,
}

impl TurnOnOptions {
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn with_rgb_color(mut self, rgb_color: [u8; 3]) -> Self {
        self.rgb_color = Some(rgb_color);
        self
    }
}

// ───────────────────────────────────────────────────────────────
// Entity contract
// ───────────────────────────────────────────────────────────────

/// What the host automation framework sees of a light.
pub trait Light {
    fn name(&self) -> &str;

    /// 0–255.
    fn brightness(&self) -> u8;

    /// `None` for single-channel lights.
    fn rgb_color(&self) -> Option<[u8; 3]>;

    fn supported_features(&self) -> SupportedFeatures;

    fn is_on(&self) -> bool;

    /// Fade on; returns once the fade has finished.
    fn turn_on(&self, options: TurnOnOptions) -> Result<()>;

    /// Switch off immediately.
    fn turn_off(&self) -> Result<()>;
}

/// A registered light, as handed to the host.
pub struct LightEntity<C: PwmChannel, T: FadeTimer> {
    controller: LedController<C, T>,
}

impl<C: PwmChannel, T: FadeTimer> LightEntity<C, T> {
    pub fn new(controller: LedController<C, T>) -> Self {
        Self { controller }
    }

    /// Async access for callers running their own executor.
    pub fn controller(&self) -> &LedController<C, T> {
        &self.controller
    }

    pub fn into_controller(self) -> LedController<C, T> {
        self.controller
    }

    /// Tear down: cancel any fade and stop the outputs.
    pub fn shutdown(&self) {
        block_on(self.controller.shutdown());
    }
}

impl<C: PwmChannel, T: FadeTimer> Light for LightEntity<C, T> {
    fn name(&self) -> &str {
        self.controller.name()
    }

    fn brightness(&self) -> u8 {
        self.controller.brightness()
    }

    fn rgb_color(&self) -> Option<[u8; 3]> {
        self.controller.rgb_color()
    }

    fn supported_features(&self) -> SupportedFeatures {
        self.controller.supported_features()
    }

    fn is_on(&self) -> bool {
        self.controller.is_on()
    }

    fn turn_on(&self, options: TurnOnOptions) -> Result<()> {
        block_on(self.controller.turn_on(options))
    }

    fn turn_off(&self) -> Result<()> {
        block_on(self.controller.turn_off())
    }
}
