//! `embedded-hal` PWM adapter.
//!
//! Wraps any [`SetDutyCycle`] implementation as a [`PwmChannel`], so boards
//! whose HAL already exposes PWM pins can be driven without a dedicated
//! adapter. Duty cycles are written as a fraction of 10 000 to keep two
//! decimal places of the controller's percentage.
//!
//! Write failures are logged and dropped; the fade carries on.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::PwmChannel;

const DUTY_SCALE: u16 = 10_000;

pub struct HalPwmChannel<P> {
    pwm: P,
}

impl<P: SetDutyCycle> HalPwmChannel<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }

    pub fn into_inner(self) -> P {
        self.pwm
    }

    fn write(&mut self, duty: f32) {
        let num = (duty.clamp(0.0, 100.0) * f32::from(DUTY_SCALE) / 100.0).round() as u16;
        if let Err(e) = self.pwm.set_duty_cycle_fraction(num, DUTY_SCALE) {
            warn!("pwm: duty write {:.2}% failed: {:?}", duty, e);
        }
    }
}

impl<P: SetDutyCycle> PwmChannel for HalPwmChannel<P> {
    fn start(&mut self, duty: f32) {
        self.write(duty);
    }

    fn change_duty_cycle(&mut self, duty: f32) {
        self.write(duty);
    }

    fn stop(&mut self) {
        if let Err(e) = self.pwm.set_duty_cycle_fully_off() {
            warn!("pwm: stop failed: {:?}", e);
        }
    }
}
