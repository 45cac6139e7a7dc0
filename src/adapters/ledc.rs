//! ESP32 LEDC adapter: GPIO output setup and hardware PWM channels.
//!
//! Implements [`GpioPort`] and [`PwmChannel`] over the LEDC peripheral
//! using raw ESP-IDF sys calls. Channels are handed out in order from
//! the eight low-speed LEDC channels; each distinct frequency gets its
//! own LEDC timer (four available).
//!
//! On non-espidf targets the adapter only records what would have been
//! written, which is enough for host-side simulation.

use heapless::Vec;
use log::{debug, info};

use crate::app::ports::{GpioPort, PwmChannel};
use crate::error::HardwareError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Low-speed LEDC channels on the ESP32 family.
pub const LEDC_CHANNELS: usize = 8;
/// LEDC timers, one per distinct PWM frequency.
pub const LEDC_TIMERS: usize = 4;
/// Duty resolution in bits, matching `LEDC_TIMER_13_BIT`. 13 bits keeps
/// 100 Hz well inside the divider range on an 80 MHz APB clock.
pub const DUTY_RESOLUTION_BITS: u32 = 13;

const DUTY_MAX: u32 = (1 << DUTY_RESOLUTION_BITS) - 1;

/// Percentage → raw LEDC duty register value.
pub fn duty_to_raw(duty: f32) -> u32 {
    let d = duty.clamp(0.0, 100.0);
    ((d / 100.0) * DUTY_MAX as f32).round() as u32
}

// ── GPIO / channel allocator ──────────────────────────────────

pub struct LedcGpio {
    next_channel: u32,
    timer_freqs: Vec<u32, LEDC_TIMERS>,
    outputs: Vec<u8, LEDC_CHANNELS>,
}

impl Default for LedcGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl LedcGpio {
    pub fn new() -> Self {
        Self {
            next_channel: 0,
            timer_freqs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Pins configured as outputs so far, in setup order.
    pub fn outputs(&self) -> &[u8] {
        &self.outputs
    }

    /// LEDC channels still free.
    pub fn free_channels(&self) -> usize {
        LEDC_CHANNELS - self.next_channel as usize
    }

    /// LEDC timer running at `frequency_hz`, configuring a new one if needed.
    fn timer_for(&mut self, pin: u8, frequency_hz: u32) -> Result<u32, HardwareError> {
        if let Some(idx) = self.timer_freqs.iter().position(|&f| f == frequency_hz) {
            return Ok(idx as u32);
        }
        let timer = self.timer_freqs.len() as u32;
        configure_timer(pin, timer, frequency_hz)?;
        self.timer_freqs
            .push(frequency_hz)
            .map_err(|_| HardwareError::NoFreeChannel)?;
        info!("ledc: timer {} at {} Hz", timer, frequency_hz);
        Ok(timer)
    }
}

impl GpioPort for LedcGpio {
    type Channel = LedcChannel;

    fn setup_output(&mut self, pin: u8) -> Result<(), HardwareError> {
        configure_output(pin)?;
        if !self.outputs.contains(&pin) {
            self.outputs
                .push(pin)
                .map_err(|_| HardwareError::NoFreeChannel)?;
        }
        debug!("ledc: GPIO{} configured as output", pin);
        Ok(())
    }

    fn init_pwm(&mut self, pin: u8, frequency_hz: u32) -> Result<LedcChannel, HardwareError> {
        if self.next_channel as usize >= LEDC_CHANNELS {
            return Err(HardwareError::NoFreeChannel);
        }
        if self.timer_freqs.len() == LEDC_TIMERS
            && !self.timer_freqs.contains(&frequency_hz)
        {
            return Err(HardwareError::NoFreeChannel);
        }
        let timer = self.timer_for(pin, frequency_hz)?;
        let channel = self.next_channel;
        configure_channel(pin, channel, timer)?;
        self.next_channel += 1;
        info!("ledc: GPIO{} → channel {} (timer {})", pin, channel, timer);
        Ok(LedcChannel::new(pin, channel))
    }
}

// ── PWM channel ───────────────────────────────────────────────

/// One configured LEDC channel.
pub struct LedcChannel {
    pin: u8,
    channel: u32,
    raw_duty: u32,
    running: bool,
}

impl LedcChannel {
    fn new(pin: u8, channel: u32) -> Self {
        Self {
            pin,
            channel,
            raw_duty: 0,
            running: false,
        }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }

    /// Last raw duty written to the peripheral.
    pub fn raw_duty(&self) -> u32 {
        self.raw_duty
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn apply(&mut self, duty: f32) {
        self.raw_duty = duty_to_raw(duty);
        write_duty(self.channel, self.raw_duty);
    }
}

impl PwmChannel for LedcChannel {
    fn start(&mut self, duty: f32) {
        self.running = true;
        self.apply(duty);
    }

    fn change_duty_cycle(&mut self, duty: f32) {
        self.apply(duty);
    }

    fn stop(&mut self) {
        stop_channel(self.channel);
        self.raw_duty = 0;
        self.running = false;
    }
}

// ── ESP-IDF register access ───────────────────────────────────

#[cfg(target_os = "espidf")]
fn configure_output(pin: u8) -> Result<(), HardwareError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: cfg is a fully initialised config for a single pin.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HardwareError::GpioSetupFailed { pin, code: ret });
    }
    // SAFETY: pin was configured as an output above.
    unsafe { gpio_set_level(i32::from(pin), 0) };
    Ok(())
}

#[cfg(target_os = "espidf")]
fn configure_timer(pin: u8, timer: u32, frequency_hz: u32) -> Result<(), HardwareError> {
    let cfg = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: timer,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_13_BIT,
        freq_hz: frequency_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: timer index is below LEDC_TIMERS; cfg is fully initialised.
    let ret = unsafe { ledc_timer_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HardwareError::PwmInitFailed { pin, code: ret });
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
fn configure_channel(pin: u8, channel: u32, timer: u32) -> Result<(), HardwareError> {
    let cfg = ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel,
        timer_sel: timer,
        gpio_num: i32::from(pin),
        duty: 0,
        hpoint: 0,
        ..Default::default()
    };
    // SAFETY: channel index is below LEDC_CHANNELS and its timer is configured.
    let ret = unsafe { ledc_channel_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HardwareError::PwmInitFailed { pin, code: ret });
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
fn write_duty(channel: u32, raw: u32) {
    // SAFETY: channel was configured in init_pwm; the controller's channel
    // lock serialises writers.
    unsafe {
        let ret = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, raw);
        if ret == ESP_OK as i32 {
            ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
        } else {
            log::warn!("ledc: set_duty ch{} failed (rc={})", channel, ret);
        }
    }
}

#[cfg(target_os = "espidf")]
fn stop_channel(channel: u32) {
    // SAFETY: channel was configured in init_pwm; idle level low.
    let ret = unsafe { ledc_stop(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, 0) };
    if ret != ESP_OK as i32 {
        log::warn!("ledc: stop ch{} failed (rc={})", channel, ret);
    }
}

#[cfg(not(target_os = "espidf"))]
fn configure_output(_pin: u8) -> Result<(), HardwareError> {
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn configure_timer(_pin: u8, _timer: u32, _frequency_hz: u32) -> Result<(), HardwareError> {
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn configure_channel(_pin: u8, _channel: u32, _timer: u32) -> Result<(), HardwareError> {
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn write_duty(_channel: u32, _raw: u32) {}

#[cfg(not(target_os = "espidf"))]
fn stop_channel(_channel: u32) {}
