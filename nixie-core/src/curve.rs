//! Duty-cycle curve
//!
//! Brightness is controlled purely in the time domain: each position is lit
//! for `bright_us` and kept dark for `dim_us` of its frame period. The eye
//! responds to flash duration non-linearly, so the duty value goes through
//! a power curve before it becomes a duration.
//!
//! `bright` and `dim` are rounded independently, so their sum may differ
//! from the frame period by one microsecond.

use nixie_protocol::MAX_DUTY;

use crate::config::DisplayConfig;

/// Number of distinct duty values
pub const DUTY_LEVELS: usize = MAX_DUTY as usize + 1;

/// Lit and dark time of one digit position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotTiming {
    pub bright_us: u16,
    pub dim_us: u16,
}

impl SlotTiming {
    /// Fully lit for the whole period
    pub const fn full(frame_period_us: u16) -> Self {
        Self {
            bright_us: frame_period_us,
            dim_us: 0,
        }
    }

    /// Timing for an explicit brightness multiplier in [0, 1]
    pub fn from_multiplier(frame_period_us: u16, multiplier: f32) -> Self {
        let multiplier = multiplier.clamp(0.0, 1.0);
        let period = frame_period_us as f32;
        Self {
            bright_us: libm::roundf(period * multiplier) as u16,
            dim_us: libm::roundf(period * (1.0 - multiplier)) as u16,
        }
    }

    pub fn total_us(&self) -> u32 {
        self.bright_us as u32 + self.dim_us as u32
    }
}

/// Map a duty value (0-15) to its bright/dim split
///
/// `multiplier = ((duty + 1) / 16) ^ gamma`. Values above 15 are treated
/// as 15. Duty 0 still yields a short bright window; the decoder blanks
/// such digits, so nothing is lit.
pub fn duty_to_timing(duty: u8, frame_period_us: u16, gamma: f32) -> SlotTiming {
    let duty = duty.min(MAX_DUTY);
    let multiplier = libm::powf((duty as f32 + 1.0) / DUTY_LEVELS as f32, gamma);
    SlotTiming::from_multiplier(frame_period_us, multiplier)
}

/// Precomputed curve for one configuration
///
/// Swaps index this table instead of evaluating `powf` per digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DutyCurve {
    table: [SlotTiming; DUTY_LEVELS],
}

impl DutyCurve {
    pub fn new(config: &DisplayConfig) -> Self {
        let mut table = [SlotTiming::default(); DUTY_LEVELS];
        for (duty, slot) in table.iter_mut().enumerate() {
            *slot = duty_to_timing(duty as u8, config.frame_period_us, config.gamma);
        }
        Self { table }
    }

    /// Timing for a duty value; values above 15 saturate
    pub fn timing(&self, duty: u8) -> SlotTiming {
        self.table[duty.min(MAX_DUTY) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_full_duty_is_full_period() {
        let t = duty_to_timing(15, 1000, 2.1);
        assert_eq!(t, SlotTiming { bright_us: 1000, dim_us: 0 });
    }

    #[test]
    fn test_zero_duty_is_small_but_nonzero() {
        // (1/16)^2.1 * 1000 ≈ 2.98
        let t = duty_to_timing(0, 1000, 2.1);
        assert_eq!(t.bright_us, 3);
        assert_eq!(t.dim_us, 997);
    }

    #[test]
    fn test_mid_duty() {
        // (8/16)^2.1 * 1000 ≈ 233.3
        let t = duty_to_timing(7, 1000, 2.1);
        assert_eq!(t.bright_us, 233);
        assert_eq!(t.dim_us, 767);
    }

    #[test]
    fn test_out_of_range_duty_saturates() {
        assert_eq!(duty_to_timing(200, 1000, 2.1), duty_to_timing(15, 1000, 2.1));
    }

    #[test]
    fn test_table_matches_function() {
        let config = DisplayConfig::default();
        let curve = DutyCurve::new(&config);
        for duty in 0..=MAX_DUTY {
            assert_eq!(
                curve.timing(duty),
                duty_to_timing(duty, config.frame_period_us, config.gamma)
            );
        }
        assert_eq!(curve.timing(99), curve.timing(15));
    }

    proptest! {
        #[test]
        fn sum_within_one_unit(duty in 0u8..16, period in 1u16..10_000, gamma in 0.5f32..4.0) {
            let t = duty_to_timing(duty, period, gamma);
            let diff = (t.total_us() as i64 - period as i64).abs();
            prop_assert!(diff <= 1, "bright {} + dim {} vs {}", t.bright_us, t.dim_us, period);
        }

        #[test]
        fn bright_is_monotonic(duty in 0u8..15, period in 1u16..10_000, gamma in 0.5f32..4.0) {
            let lower = duty_to_timing(duty, period, gamma);
            let upper = duty_to_timing(duty + 1, period, gamma);
            prop_assert!(lower.bright_us <= upper.bright_us);
        }
    }
}
