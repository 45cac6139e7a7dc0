//! Light configuration parameters
//!
//! Per-light registration settings supplied by the host automation
//! framework, plus the fixed timing constants of the fade driver.

use core::fmt;
use core::time::Duration;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Name used when the configuration omits one.
pub const DEFAULT_NAME: &str = "LED";

/// PWM carrier frequency for every channel.
pub const PWM_FREQUENCY_HZ: u32 = 100;

/// Delay between consecutive fade steps.
pub const STEP_DELAY: Duration = Duration::from_millis(10);

/// Brightness used by `turn_on` when none is given.
pub const DEFAULT_BRIGHTNESS: u8 = 255;

/// Colour an RGB light starts with before any colour is committed.
pub const DEFAULT_COLOR: [u8; 3] = [255, 255, 255];

/// Channel layout of a light. Fixed for the lifetime of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightMode {
    /// One PWM channel, brightness only.
    Single,
    /// Three PWM channels (R, G, B), brightness and colour.
    Rgb,
}

impl LightMode {
    /// Number of ports/channels this mode drives.
    pub const fn channel_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Rgb => 3,
        }
    }
}

impl fmt::Display for LightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Rgb => write!(f, "rgb"),
        }
    }
}

/// Registration parameters for one light.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightConfig {
    /// Display name reported to the host.
    #[serde(default = "default_name")]
    pub name: String,
    pub mode: LightMode,
    /// Ordered GPIO pins, one per channel (R, G, B order in RGB mode).
    #[serde(deserialize_with = "deserialize_ports")]
    pub ports: Vec<u8>,
}

impl LightConfig {
    pub fn new(name: impl Into<String>, mode: LightMode, ports: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mode,
            ports,
        }
    }

    /// Parse a JSON platform entry, e.g. `{"mode": "rgb", "ports": [17, 27, 22]}`.
    ///
    /// Only syntax is checked here; call [`validate`](Self::validate) for
    /// the port-count rule.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject a port list whose length does not match the mode.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_port_count(self.mode, self.ports.len())
    }
}

pub(crate) fn check_port_count(mode: LightMode, actual: usize) -> Result<(), ConfigError> {
    let expected = mode.channel_count();
    if actual == expected {
        Ok(())
    } else {
        Err(ConfigError::PortCount {
            mode,
            expected,
            actual,
        })
    }
}

fn default_name() -> String {
    DEFAULT_NAME.into()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u8),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortList {
    One(PortValue),
    Many(Vec<PortValue>),
}

/// Accepts a scalar or a list; numeric strings are coerced to integers.
fn deserialize_ports<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let values = match PortList::deserialize(deserializer)? {
        PortList::One(v) => vec![v],
        PortList::Many(v) => v,
    };
    values
        .into_iter()
        .map(|v| match v {
            PortValue::Number(n) => Ok(n),
            PortValue::Text(s) => s
                .trim()
                .parse::<u8>()
                .map_err(|_| D::Error::custom(format!("invalid port {s:?}"))),
        })
        .collect()
}
