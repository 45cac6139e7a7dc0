//! Port traits: the hexagonal boundary between the fade logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LedController (domain)
//! ```
//!
//! Driven adapters (GPIO/PWM peripherals, clocks) implement these traits.
//! The [`LedController`](super::controller::LedController) consumes them via
//! generics, so the fade logic never touches hardware directly.

use core::future::Future;
use core::time::Duration;

use crate::error::HardwareError;

// ───────────────────────────────────────────────────────────────
// PWM channel (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// One hardware PWM output, already configured for its pin and frequency.
///
/// Duty cycles are percentages. The controller clamps them to 0–100
/// before calling in, so implementations can assume the range.
/// Write failures are the adapter's concern; they are not reported back.
pub trait PwmChannel {
    /// Begin PWM output at `duty`. Called for the first write after
    /// setup or after [`stop`](Self::stop).
    fn start(&mut self, duty: f32);

    /// Update the duty cycle of a running output.
    fn change_duty_cycle(&mut self, duty: f32);

    /// Halt PWM output.
    fn stop(&mut self);
}

// ───────────────────────────────────────────────────────────────
// GPIO port (driven adapter: pin setup)
// ───────────────────────────────────────────────────────────────

/// Pin setup capability used once per port at controller construction.
pub trait GpioPort {
    type Channel: PwmChannel;

    /// Configure `pin` as a PWM-capable output.
    fn setup_output(&mut self, pin: u8) -> Result<(), HardwareError>;

    /// Attach a PWM channel to `pin` running at `frequency_hz`.
    fn init_pwm(&mut self, pin: u8, frequency_hz: u32) -> Result<Self::Channel, HardwareError>;
}

// ───────────────────────────────────────────────────────────────
// Fade timer (driven adapter: monotonic clock)
// ───────────────────────────────────────────────────────────────

/// Monotonic clock and timed wait used to pace fade steps.
///
/// Deadlines are absolute offsets on the timer's own clock, so a fade
/// that computes `start + n * STEP_DELAY` does not drift with per-step
/// overhead. Dropping the returned future cancels the wait.
pub trait FadeTimer {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Complete once [`now`](Self::now) has reached `deadline`.
    fn sleep_until(&self, deadline: Duration) -> impl Future<Output = ()>;
}
