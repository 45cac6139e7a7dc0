//! Fade trajectories.
//!
//! Pure step math for the two fade shapes, kept separate from timing and
//! hardware so every write of a fade can be checked without a clock.
//!
//! | Fade    | Steps | Writes per step                              |
//! |---------|-------|----------------------------------------------|
//! | Single  | 20    | channel 0, linear from current to target     |
//! | RGB     | 40    | rising channels in steps 0–19, falling 20–39 |

/// Steps of a single-channel fade (and of each half of an RGB fade).
pub const SINGLE_STEPS: usize = 20;

/// Steps of an RGB fade: an attack half followed by a release half.
pub const RGB_STEPS: usize = 2 * SINGLE_STEPS;

/// Duty written to each channel at one step; `None` where the channel is
/// left alone.
pub type StepWrites = [Option<f32>; 3];

/// Convert a 0–255 brightness into the 0.0–1.0 fraction the fades use.
pub fn brightness_fraction(brightness: u8) -> f32 {
    f32::from(brightness) / 255.0
}

// ── Single channel ────────────────────────────────────────────

/// Linear fade of channel 0 from its recorded duty to `fraction × 100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleFade {
    start: f32,
    target: f32,
}

impl SingleFade {
    /// `current` is the channel's recorded duty; unset fades start from 0.
    pub fn new(current: Option<f32>, target_fraction: f32) -> Self {
        Self {
            start: current.unwrap_or(0.0),
            target: target_fraction * 100.0,
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn delta(&self) -> f32 {
        self.target - self.start
    }

    /// Duty cycle written at `step` (0-based). The final step lands
    /// exactly on the target.
    pub fn duty_at(&self, step: usize) -> f32 {
        if step + 1 >= SINGLE_STEPS {
            return self.target;
        }
        self.start + self.delta() * ((step + 1) as f32 / SINGLE_STEPS as f32)
    }
}

// ── Three channel ─────────────────────────────────────────────

/// Independent per-channel linear fades with directional gating.
///
/// Channels whose duty rises move during the first half of the fade,
/// channels whose duty falls move during the second half, unchanged
/// channels are never written. Every write is `base + delta × (step + 1)`
/// on the global step index, so a falling channel's first release write
/// is already `21 × delta` from its base and can run past zero; the
/// controller's clamp holds it at the floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbFade {
    base: [f32; 3],
    delta: [f32; 3],
}

impl RgbFade {
    /// * `current_duty`: recorded duty per channel (unset counts as 0).
    /// * `current_color` / `current_brightness`: last committed state.
    /// * `target_color` / `target_fraction`: requested state.
    pub fn new(
        current_duty: [Option<f32>; 3],
        current_color: [u8; 3],
        current_brightness: u8,
        target_color: [u8; 3],
        target_fraction: f32,
    ) -> Self {
        let current_fraction = brightness_fraction(current_brightness);
        let base = current_duty.map(|d| d.unwrap_or(0.0));
        let delta = core::array::from_fn(|c| {
            let target = f32::from(target_color[c]) * target_fraction;
            let current = f32::from(current_color[c]) * current_fraction;
            (target - current) * 100.0 / 255.0 / SINGLE_STEPS as f32
        });
        Self { base, delta }
    }

    /// Per-step duty change of each channel.
    pub fn deltas(&self) -> [f32; 3] {
        self.delta
    }

    /// Writes issued at `step` (0-based, `< RGB_STEPS`), before clamping.
    pub fn writes_at(&self, step: usize) -> StepWrites {
        core::array::from_fn(|c| {
            let delta = self.delta[c];
            let active = if delta > 0.0 {
                step < SINGLE_STEPS
            } else if delta < 0.0 {
                (SINGLE_STEPS..RGB_STEPS).contains(&step)
            } else {
                false
            };
            active.then(|| self.base[c] + delta * (step + 1) as f32)
        })
    }
}
