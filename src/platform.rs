//! Light platform registration.
//!
//! Entry point the host automation framework calls once per configured
//! light. A rejected configuration is reported and no device is created;
//! the error never propagates as a panic.

use log::{error, info};

use crate::app::controller::LedController;
use crate::app::entity::LightEntity;
use crate::app::ports::{FadeTimer, GpioPort};
use crate::config::LightConfig;
use crate::error::{ConfigError, Result};

/// Validate `config` and build the light on `gpio`.
pub fn setup_platform<G, T>(
    config: &LightConfig,
    gpio: &mut G,
    timer: T,
) -> Result<LightEntity<G::Channel, T>>
where
    G: GpioPort,
    T: FadeTimer,
{
    info!("Setting up LED platform for \"{}\"", config.name);

    if let Err(e) = config.validate() {
        error!(
            "Incorrect number of ports given for device \"{}\". It will not be added",
            config.name
        );
        return Err(e.into());
    }

    let controller = LedController::new(config.name.clone(), config.mode, &config.ports, gpio, timer)
        .inspect_err(|e| error!("LED \"{}\" setup failed: {}", config.name, e))?;
    Ok(LightEntity::new(controller))
}

/// Parse a JSON platform entry and register it.
pub fn setup_from_json<G, T>(json: &str, gpio: &mut G, timer: T) -> Result<LightEntity<G::Channel, T>>
where
    G: GpioPort,
    T: FadeTimer,
{
    let config = LightConfig::from_json(json).inspect_err(|e: &ConfigError| {
        error!("Invalid LED platform config: {}", e);
    })?;
    setup_platform(&config, gpio, timer)
}
