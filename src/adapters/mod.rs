//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter   | Implements          | Connects to                  |
//! |-----------|---------------------|------------------------------|
//! | `ledc`    | GpioPort            | ESP32 GPIO matrix            |
//! |           | PwmChannel          | ESP32 LEDC PWM               |
//! | `hal_pwm` | PwmChannel          | any `embedded-hal` PWM pin   |
//! | `time`    | FadeTimer           | ESP32 system timer / Instant |

pub mod hal_pwm;
pub mod ledc;
pub mod time;
