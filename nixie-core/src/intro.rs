//! Intro animation
//!
//! An alternate producer that writes straight into the active frame once
//! per pass, bypassing the pending frame. Digits come up one after another
//! showing 6, each ramping from dark to full brightness; the two point
//! lamps light at the start and at the midpoint.

use crate::curve::SlotTiming;
use crate::frame::{ActiveFrame, DigitValue};

/// Length of the animation in multiplexing passes
///
/// Divisible by `2 * N` for every supported digit count.
pub const INTRO_PASSES: u16 = 600;

/// Digit shown by every lamp during the intro
pub const INTRO_DIGIT: u8 = 6;

/// Brightness ramp exponent
const RAMP_POWER: f32 = 2.5;

/// Intro animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntroAnimation<const N: usize> {
    pass: u16,
    frame_period_us: u16,
}

impl<const N: usize> IntroAnimation<N> {
    /// A finished animation; call [`restart`](Self::restart) to play it
    pub const fn new(frame_period_us: u16) -> Self {
        Self {
            pass: INTRO_PASSES,
            frame_period_us,
        }
    }

    pub fn restart(&mut self) {
        self.pass = 0;
    }

    pub fn is_finished(&self) -> bool {
        self.pass >= INTRO_PASSES
    }

    /// Render the current pass into `frame`
    ///
    /// Returns `true` while further passes remain.
    pub fn step(&mut self, frame: &mut ActiveFrame<N>) -> bool {
        if self.is_finished() {
            return false;
        }

        let pass = self.pass as i32;
        let half = (INTRO_PASSES / 2) as i32;
        let stagger = (INTRO_PASSES as usize / (2 * N)) as i32;

        for address in 0..N {
            let start = address as i32 * stagger;
            if pass == start {
                frame.digits[address] = DigitValue::Digit(INTRO_DIGIT);
            }
            if address < frame.points.len() && pass == address as i32 * half {
                frame.points[frame.points.len() - 1 - address] = true;
            }

            let ramp = (pass - start).clamp(1, half) as f32 / half as f32;
            frame.timings[address] =
                SlotTiming::from_multiplier(self.frame_period_us, libm::powf(ramp, RAMP_POWER));
        }

        self.pass += 1;
        !self.is_finished()
    }
}
