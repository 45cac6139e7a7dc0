//! Unified error types for the LED fade driver.
//!
//! A single `Error` enum that every subsystem converts into, so the host
//! registration path and the entity contract report failures uniformly.

use core::fmt;

use crate::config::LightMode;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The light configuration was rejected.
    Config(ConfigError),
    /// The GPIO/PWM collaborator failed during setup.
    Hardware(HardwareError),
    /// A fade routine was invoked on a light of the other mode.
    ModeMismatch { expected: LightMode, actual: LightMode },
    /// Channel index outside the configured channel count.
    NoSuchChannel(usize),
    /// The controller has been shut down and no longer drives hardware.
    ShutDown,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::ModeMismatch { expected, actual } => {
                write!(f, "operation requires {expected} mode, light is {actual}")
            }
            Self::NoSuchChannel(idx) => write!(f, "no such channel: {idx}"),
            Self::ShutDown => write!(f, "controller shut down"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Port list length does not match the mode's channel count.
    PortCount {
        mode: LightMode,
        expected: usize,
        actual: usize,
    },
    /// The configuration document could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PortCount {
                mode,
                expected,
                actual,
            } => write!(f, "{mode} mode needs {expected} port(s), got {actual}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Hardware errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    /// Configuring the pin as an output failed (driver return code).
    GpioSetupFailed { pin: u8, code: i32 },
    /// PWM timer/channel configuration failed (driver return code).
    PwmInitFailed { pin: u8, code: i32 },
    /// Every hardware PWM channel is already allocated.
    NoFreeChannel,
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioSetupFailed { pin, code } => {
                write!(f, "GPIO{pin} output setup failed (rc={code})")
            }
            Self::PwmInitFailed { pin, code } => {
                write!(f, "GPIO{pin} PWM init failed (rc={code})")
            }
            Self::NoFreeChannel => write!(f, "no free PWM channel"),
        }
    }
}

impl From<HardwareError> for Error {
    fn from(e: HardwareError) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
