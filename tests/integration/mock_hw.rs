//! Mock hardware adapters for integration tests.
//!
//! Records every GPIO/PWM call so tests can assert on the full write
//! history without touching real LEDC registers, and provides fake
//! clocks that never sleep.

use std::future::{Future, pending, ready};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ledfade::HardwareError;
use ledfade::app::ports::{FadeTimer, GpioPort, PwmChannel};

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PwmCall {
    SetupOutput { pin: u8 },
    InitPwm { pin: u8, frequency_hz: u32 },
    Start { channel: usize, duty: f32 },
    Change { channel: usize, duty: f32 },
    Stop { channel: usize },
}

/// Shared, thread-safe call history.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<PwmCall>>>);

#[allow(dead_code)]
impl CallLog {
    fn push(&self, call: PwmCall) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<PwmCall> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    /// Duty values written (start or change) to `channel`, in order.
    pub fn duties(&self, channel: usize) -> Vec<f32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PwmCall::Start { channel: ch, duty } | PwmCall::Change { channel: ch, duty }
                    if ch == channel =>
                {
                    Some(duty)
                }
                _ => None,
            })
            .collect()
    }

    /// Every start/change write as `(channel, duty)`.
    pub fn writes(&self) -> Vec<(usize, f32)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PwmCall::Start { channel, duty } | PwmCall::Change { channel, duty } => {
                    Some((channel, duty))
                }
                _ => None,
            })
            .collect()
    }

    pub fn stops(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, PwmCall::Stop { .. }))
            .count()
    }

    pub fn hardware_setup_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, PwmCall::SetupOutput { .. } | PwmCall::InitPwm { .. }))
            .count()
    }
}

// ── MockGpio / MockPwm ────────────────────────────────────────

pub struct MockGpio {
    pub log: CallLog,
    next_channel: usize,
    fail_pin: Option<u8>,
}

#[allow(dead_code)]
impl MockGpio {
    pub fn new() -> Self {
        Self {
            log: CallLog::default(),
            next_channel: 0,
            fail_pin: None,
        }
    }

    /// Make `setup_output` fail for `pin`.
    pub fn failing_on(pin: u8) -> Self {
        Self {
            fail_pin: Some(pin),
            ..Self::new()
        }
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioPort for MockGpio {
    type Channel = MockPwm;

    fn setup_output(&mut self, pin: u8) -> Result<(), HardwareError> {
        if self.fail_pin == Some(pin) {
            return Err(HardwareError::GpioSetupFailed { pin, code: -1 });
        }
        self.log.push(PwmCall::SetupOutput { pin });
        Ok(())
    }

    fn init_pwm(&mut self, pin: u8, frequency_hz: u32) -> Result<MockPwm, HardwareError> {
        self.log.push(PwmCall::InitPwm { pin, frequency_hz });
        let channel = self.next_channel;
        self.next_channel += 1;
        Ok(MockPwm {
            channel,
            log: self.log.clone(),
        })
    }
}

pub struct MockPwm {
    channel: usize,
    log: CallLog,
}

impl PwmChannel for MockPwm {
    fn start(&mut self, duty: f32) {
        self.log.push(PwmCall::Start {
            channel: self.channel,
            duty,
        });
    }

    fn change_duty_cycle(&mut self, duty: f32) {
        self.log.push(PwmCall::Change {
            channel: self.channel,
            duty,
        });
    }

    fn stop(&mut self) {
        self.log.push(PwmCall::Stop {
            channel: self.channel,
        });
    }
}

// ── Timers ────────────────────────────────────────────────────

#[derive(Default)]
struct ClockInner {
    now_us: AtomicU64,
    deadlines: Mutex<Vec<Duration>>,
}

/// Fake clock that jumps straight to each requested deadline and
/// records it. Clones share the same clock.
#[derive(Clone, Default)]
pub struct ManualTimer(Arc<ClockInner>);

#[allow(dead_code)]
impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock somewhere other than zero.
    pub fn at(start: Duration) -> Self {
        let t = Self::default();
        t.0.now_us.store(start.as_micros() as u64, Ordering::SeqCst);
        t
    }

    /// Deadlines requested so far, in order.
    pub fn deadlines(&self) -> Vec<Duration> {
        self.0.deadlines.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.deadlines.lock().unwrap().clear();
    }
}

impl FadeTimer for ManualTimer {
    fn now(&self) -> Duration {
        Duration::from_micros(self.0.now_us.load(Ordering::SeqCst))
    }

    fn sleep_until(&self, deadline: Duration) -> impl Future<Output = ()> {
        self.0.deadlines.lock().unwrap().push(deadline);
        self.0
            .now_us
            .fetch_max(deadline.as_micros() as u64, Ordering::SeqCst);
        ready(())
    }
}

/// Timer whose waits never finish on their own.
pub struct PendingTimer;

impl FadeTimer for PendingTimer {
    fn now(&self) -> Duration {
        Duration::ZERO
    }

    fn sleep_until(&self, _deadline: Duration) -> impl Future<Output = ()> {
        pending()
    }
}

/// Timer that blocks the calling thread briefly on every wait, so fades
/// started from different threads overlap in time.
pub struct SlowTimer;

impl FadeTimer for SlowTimer {
    fn now(&self) -> Duration {
        Duration::ZERO
    }

    fn sleep_until(&self, _deadline: Duration) -> impl Future<Output = ()> {
        std::thread::sleep(Duration::from_micros(200));
        ready(())
    }
}
