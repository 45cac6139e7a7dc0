//! Fade controller: the hexagonal core.
//!
//! [`LedController`] owns the PWM channels of one light and its logical
//! [`LightState`]. All hardware I/O flows through the [`PwmChannel`] and
//! [`FadeTimer`] ports, so the controller is testable with mock adapters.
//!
//! ```text
//!  turn_on ──▶ ┌──────────────────────────┐ ──▶ PwmChannel × 1|3
//!  turn_off ──▶│      LedController       │
//!  queries ◀── │ fade math · state · lock │ ◀── FadeTimer
//!              └──────────────────────────┘
//! ```
//!
//! ## Concurrency
//!
//! Channels sit behind an async mutex that a fade holds from its first
//! write to its last wait, so fades on one controller are serialised and
//! their writes never interleave. The logical state is kept separately
//! and can be read at any time. [`LedController::shutdown`] is the only
//! way to interrupt a fade; the fade stops at its next wait and never
//! commits its target.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_sync::signal::Signal;
use futures_lite::future;
use heapless::Vec;
use log::{debug, info};

use crate::config::{
    DEFAULT_BRIGHTNESS, DEFAULT_COLOR, LightMode, PWM_FREQUENCY_HZ, STEP_DELAY, check_port_count,
};
use crate::error::{Error, HardwareError, Result};

use super::entity::{SupportedFeatures, TurnOnOptions};
use super::fade::{RGB_STEPS, RgbFade, SINGLE_STEPS, SingleFade, brightness_fraction};
use super::ports::{FadeTimer, GpioPort, PwmChannel};

/// Largest number of channels a light can drive (RGB mode).
pub const MAX_CHANNELS: usize = 3;

// ───────────────────────────────────────────────────────────────
// State
// ───────────────────────────────────────────────────────────────

/// Logical (not hardware) state of a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightState {
    pub is_on: bool,
    /// 0–255; always 0 while off.
    pub brightness: u8,
    /// Last committed colour. Only meaningful in RGB mode.
    pub rgb_color: [u8; 3],
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            is_on: false,
            brightness: 0,
            rgb_color: DEFAULT_COLOR,
        }
    }
}

/// How a fade ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeOutcome {
    /// Every step was written and waited out.
    Completed,
    /// Interrupted by [`LedController::shutdown`].
    Cancelled,
}

// ───────────────────────────────────────────────────────────────
// Channel
// ───────────────────────────────────────────────────────────────

struct Channel<C> {
    pwm: C,
    /// `None` until the first write and again after a stop.
    duty: Option<f32>,
}

impl<C: PwmChannel> Channel<C> {
    /// The single hardware write path. Clamps, then starts or updates.
    fn write(&mut self, index: usize, duty: f32) -> f32 {
        let duty = if duty.is_nan() {
            0.0
        } else {
            duty.clamp(0.0, 100.0)
        };
        debug!("pwm[{}] = {:.3}", index, duty);

        if self.duty.is_some() {
            self.pwm.change_duty_cycle(duty);
        } else {
            self.pwm.start(duty);
        }
        self.duty = Some(duty);
        duty
    }

    fn stop(&mut self) {
        self.pwm.stop();
        self.duty = None;
    }
}

type Channels<C> = Vec<Channel<C>, MAX_CHANNELS>;

// ───────────────────────────────────────────────────────────────
// LedController
// ───────────────────────────────────────────────────────────────

/// Drives one single-channel or RGB light through stepped fades.
pub struct LedController<C: PwmChannel, T: FadeTimer> {
    name: String,
    mode: LightMode,
    channels: Mutex<CriticalSectionRawMutex, Channels<C>>,
    state: BlockingMutex<CriticalSectionRawMutex, Cell<LightState>>,
    timer: T,
    shut_down: AtomicBool,
    cancel: Signal<CriticalSectionRawMutex, ()>,
}

impl<C: PwmChannel, T: FadeTimer> LedController<C, T> {
    /// Validate the port list, then set up one PWM channel per port.
    ///
    /// Fails without touching hardware when the port count does not match
    /// `mode`. GPIO errors are passed through unchanged.
    pub fn new<G>(
        name: impl Into<String>,
        mode: LightMode,
        ports: &[u8],
        gpio: &mut G,
        timer: T,
    ) -> Result<Self>
    where
        G: GpioPort<Channel = C>,
    {
        let name = name.into();
        check_port_count(mode, ports.len())?;

        let mut channels = Channels::new();
        for &pin in ports {
            gpio.setup_output(pin)?;
            let pwm = gpio.init_pwm(pin, PWM_FREQUENCY_HZ)?;
            channels
                .push(Channel { pwm, duty: None })
                .map_err(|_| HardwareError::NoFreeChannel)?;
        }

        info!(
            "LED '{}' ready: mode={} ports={:?} @ {} Hz",
            name, mode, ports, PWM_FREQUENCY_HZ
        );

        Ok(Self {
            name,
            mode,
            channels: Mutex::new(channels),
            state: BlockingMutex::new(Cell::new(LightState::default())),
            timer,
            shut_down: AtomicBool::new(false),
            cancel: Signal::new(),
        })
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> LightMode {
        self.mode
    }

    /// Snapshot of the committed logical state. Never waits for a fade.
    pub fn state(&self) -> LightState {
        self.state.lock(Cell::get)
    }

    pub fn brightness(&self) -> u8 {
        self.state().brightness
    }

    /// Committed colour; `None` for single-channel lights.
    pub fn rgb_color(&self) -> Option<[u8; 3]> {
        match self.mode {
            LightMode::Rgb => Some(self.state().rgb_color),
            LightMode::Single => None,
        }
    }

    pub fn is_on(&self) -> bool {
        self.state().is_on
    }

    pub fn supported_features(&self) -> SupportedFeatures {
        SupportedFeatures::for_mode(self.mode)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    /// Last duty cycle written to channel `index`, `None` if unset.
    ///
    /// Waits for an in-flight fade to finish.
    pub async fn channel_duty_cycle(&self, index: usize) -> Result<Option<f32>> {
        let channels = self.channels.lock().await;
        channels
            .get(index)
            .map(|ch| ch.duty)
            .ok_or(Error::NoSuchChannel(index))
    }

    // ── Hardware write path ───────────────────────────────────

    /// Write one channel directly, clamped to 0–100. Returns the value
    /// actually written.
    pub async fn set_channel_duty_cycle(&self, index: usize, duty: f32) -> Result<f32> {
        let mut channels = self.lock_channels().await?;
        let channel = channels
            .get_mut(index)
            .ok_or(Error::NoSuchChannel(index))?;
        Ok(channel.write(index, duty))
    }

    // ── Fades ─────────────────────────────────────────────────

    /// Single-channel fade to `target_fraction` (0.0–1.0) of full duty.
    ///
    /// Does not touch the logical state; [`turn_on`](Self::turn_on) commits it.
    pub async fn fade_single(&self, target_fraction: f32) -> Result<FadeOutcome> {
        self.require_mode(LightMode::Single)?;
        let mut channels = self.lock_channels().await?;
        Ok(self.run_single(&mut channels, target_fraction).await)
    }

    /// Three-channel gated fade towards `target_color` at `target_fraction`.
    ///
    /// Does not touch the logical state; [`turn_on`](Self::turn_on) commits it.
    pub async fn fade_rgb(&self, target_fraction: f32, target_color: [u8; 3]) -> Result<FadeOutcome> {
        self.require_mode(LightMode::Rgb)?;
        let mut channels = self.lock_channels().await?;
        Ok(self.run_rgb(&mut channels, target_fraction, target_color).await)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Fade to the requested brightness (default 255) and, in RGB mode,
    /// colour (default: last committed colour), then commit the new state.
    pub async fn turn_on(&self, options: TurnOnOptions) -> Result<()> {
        let mut channels = self.lock_channels().await?;
        let brightness = options.brightness.unwrap_or(DEFAULT_BRIGHTNESS);
        let fraction = brightness_fraction(brightness);
        let current = self.state();

        let (outcome, rgb_color) = match self.mode {
            LightMode::Single => {
                if let Some(color) = options.rgb_color {
                    debug!("{}: single-channel light ignores colour {:?}", self.name, color);
                }
                (self.run_single(&mut channels, fraction).await, current.rgb_color)
            }
            LightMode::Rgb => {
                let color = options.rgb_color.unwrap_or(current.rgb_color);
                (self.run_rgb(&mut channels, fraction, color).await, color)
            }
        };

        if outcome == FadeOutcome::Cancelled {
            return Err(Error::ShutDown);
        }

        self.state.lock(|s| {
            s.set(LightState {
                is_on: true,
                brightness,
                rgb_color,
            });
        });
        info!(
            "{}: on (brightness={}, color={:?})",
            self.name, brightness, rgb_color
        );
        Ok(())
    }

    /// Stop every channel immediately and reset to Off. Colour is kept.
    pub async fn turn_off(&self) -> Result<()> {
        let mut channels = self.lock_channels().await?;
        Self::stop_all(&mut channels);
        self.mark_off();
        info!("{}: off", self.name);
        Ok(())
    }

    /// Cancel any in-flight fade, stop all channels and refuse further
    /// commands. Idempotent.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        self.cancel.signal(());

        let mut channels = self.channels.lock().await;
        Self::stop_all(&mut channels);
        self.mark_off();
        info!("{}: shut down", self.name);
    }

    // ── Internals ─────────────────────────────────────────────

    async fn lock_channels(&self) -> Result<MutexGuard<'_, CriticalSectionRawMutex, Channels<C>>> {
        let guard = self.channels.lock().await;
        if self.is_shut_down() {
            return Err(Error::ShutDown);
        }
        Ok(guard)
    }

    fn require_mode(&self, expected: LightMode) -> Result<()> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(Error::ModeMismatch {
                expected,
                actual: self.mode,
            })
        }
    }

    fn mark_off(&self) {
        self.state.lock(|s| {
            let mut st = s.get();
            st.is_on = false;
            st.brightness = 0;
            s.set(st);
        });
    }

    fn stop_all(channels: &mut Channels<C>) {
        for ch in channels.iter_mut() {
            ch.stop();
        }
    }

    async fn run_single(&self, channels: &mut Channels<C>, target_fraction: f32) -> FadeOutcome {
        let fade = SingleFade::new(channels[0].duty, target_fraction);
        debug!(
            "{}: fade_single -> {:.1}% (delta {:.3})",
            self.name,
            fade.target(),
            fade.delta()
        );

        let start = self.timer.now();
        for step in 0..SINGLE_STEPS {
            channels[0].write(0, fade.duty_at(step));
            if self.wait_step(start, step).await == FadeOutcome::Cancelled {
                return FadeOutcome::Cancelled;
            }
        }
        FadeOutcome::Completed
    }

    async fn run_rgb(
        &self,
        channels: &mut Channels<C>,
        target_fraction: f32,
        target_color: [u8; 3],
    ) -> FadeOutcome {
        let current = self.state();
        let current_duty = core::array::from_fn(|c| channels.get(c).and_then(|ch| ch.duty));
        let fade = RgbFade::new(
            current_duty,
            current.rgb_color,
            current.brightness,
            target_color,
            target_fraction,
        );
        debug!(
            "{}: fade_rgb brightness {:.3}, color {:?} (from b={}, c={:?}), delta {:?}",
            self.name,
            target_fraction,
            target_color,
            current.brightness,
            current.rgb_color,
            fade.deltas()
        );

        let start = self.timer.now();
        for step in 0..RGB_STEPS {
            for (c, duty) in fade.writes_at(step).into_iter().enumerate() {
                if let Some(duty) = duty {
                    channels[c].write(c, duty);
                }
            }
            if self.wait_step(start, step).await == FadeOutcome::Cancelled {
                return FadeOutcome::Cancelled;
            }
        }
        FadeOutcome::Completed
    }

    /// Wait until the end of `step`, measured from the fade's start.
    async fn wait_step(&self, start: Duration, step: usize) -> FadeOutcome {
        if self.is_shut_down() {
            return FadeOutcome::Cancelled;
        }
        let deadline = start + STEP_DELAY * (step as u32 + 1);
        future::or(
            async {
                self.timer.sleep_until(deadline).await;
                FadeOutcome::Completed
            },
            async {
                self.cancel.wait().await;
                FadeOutcome::Cancelled
            },
        )
        .await
    }
}

impl<C: PwmChannel, T: FadeTimer> Drop for LedController<C, T> {
    fn drop(&mut self) {
        if !*self.shut_down.get_mut() {
            Self::stop_all(self.channels.get_mut());
        }
    }
}
