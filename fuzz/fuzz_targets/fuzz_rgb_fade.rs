//! Fuzz target: RGB fade trajectory
//!
//! Drives `RgbFade` with arbitrary start/target states and checks that
//! no channel is written in both halves and every write is finite.
//!
//! cargo fuzz run fuzz_rgb_fade

#![no_main]

use libfuzzer_sys::fuzz_target;
use ledfade::app::fade::{brightness_fraction, RgbFade, RGB_STEPS, SINGLE_STEPS};

fuzz_target!(|data: [u8; 8]| {
    let [r0, g0, b0, bright0, r1, g1, b1, bright1] = data;
    let from_fraction = brightness_fraction(bright0);
    let duty = [r0, g0, b0].map(|v| Some(f32::from(v) * from_fraction * 100.0 / 255.0));
    let fade = RgbFade::new(
        duty,
        [r0, g0, b0],
        bright0,
        [r1, g1, b1],
        brightness_fraction(bright1),
    );

    let mut attack = [false; 3];
    let mut release = [false; 3];
    for step in 0..RGB_STEPS {
        for (c, duty) in fade.writes_at(step).into_iter().enumerate() {
            let Some(duty) = duty else {
                continue;
            };
            assert!(duty.is_finite());
            if step < SINGLE_STEPS {
                attack[c] = true;
            } else {
                release[c] = true;
            }
        }
    }
    for c in 0..3 {
        assert!(!(attack[c] && release[c]));
    }
});
