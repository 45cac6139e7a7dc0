//! Monotonic fade timer adapter.
//!
//! Implements [`FadeTimer`] for the fade controller.
//!
//! - **`target_os = "espidf"`**: reads `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side testing and simulation.
//!
//! Waits are reactor timers from `async-io-mini`, so a pending wait can be
//! dropped (cancelled) at any point.

use core::future::Future;
use core::time::Duration;

use crate::app::ports::FadeTimer;

/// Timer adapter backed by the platform's monotonic clock.
pub struct MonotonicTimer {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicTimer {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Time since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime(&self) -> Duration {
        // SAFETY: esp_timer_get_time reads the RTC counter; no shared state.
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        Duration::from_micros(us.max(0) as u64)
    }

    /// Time since this timer was created (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime(&self) -> Duration {
        self.start.elapsed()
    }
}

impl FadeTimer for MonotonicTimer {
    fn now(&self) -> Duration {
        self.uptime()
    }

    fn sleep_until(&self, deadline: Duration) -> impl Future<Output = ()> {
        let remaining = deadline.saturating_sub(self.uptime());
        async move {
            if !remaining.is_zero() {
                async_io_mini::Timer::after(remaining).await;
            }
        }
    }
}
