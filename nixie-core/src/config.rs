//! Display configuration
//!
//! The digit count is a const generic on every engine type; the remaining
//! tunables live in [`DisplayConfig`]. Firmware builds generate the config
//! from `display.toml` at compile time.

/// Smallest supported display
pub const MIN_DIGITS: usize = 2;

/// Largest supported display (anode lines available on the board)
pub const MAX_DIGITS: usize = 6;

/// Default frame period per digit position
pub const DEFAULT_FRAME_PERIOD_US: u16 = 1000;

/// Below this gap the tubes show afterimages of the previous position
pub const DEFAULT_AFTER_IMAGE_US: u16 = 300;

/// Exponent of the duty-cycle curve
pub const DEFAULT_GAMMA: f32 = 2.1;

/// Default 7-bit bus address
pub const DEFAULT_BUS_ADDRESS: u8 = 0x04;

/// Delay between bring-up and enabling the high-voltage supply
pub const DEFAULT_POWER_UP_DELAY_MS: u16 = 100;

/// Compile-time check of the digit count
///
/// Evaluating [`DigitCount::OK`] for an unsupported `N` fails the build.
pub struct DigitCount<const N: usize>;

impl<const N: usize> DigitCount<N> {
    pub const OK: () = assert!(
        N >= MIN_DIGITS && N <= MAX_DIGITS,
        "digit count must be between 2 and 6"
    );
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Frame period must be non-zero
    ZeroFramePeriod,
    /// After-image gap must be non-zero
    ZeroAfterImage,
    /// Gamma must be finite and in (0, 8]
    InvalidGamma,
    /// Bus address does not fit in 7 bits
    InvalidBusAddress,
}

/// Display timing and bus configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Bright + dim time of one digit position (µs)
    pub frame_period_us: u16,
    /// Blank gap after each position (µs)
    pub after_image_us: u16,
    /// Exponent of the duty-cycle curve
    pub gamma: f32,
    /// 7-bit I2C target address
    pub bus_address: u8,
    /// Start the intro animation right after bring-up
    pub intro_on_boot: bool,
    /// Wait before enabling the high-voltage supply (ms)
    pub power_up_delay_ms: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl DisplayConfig {
    pub const DEFAULT: Self = Self {
        frame_period_us: DEFAULT_FRAME_PERIOD_US,
        after_image_us: DEFAULT_AFTER_IMAGE_US,
        gamma: DEFAULT_GAMMA,
        bus_address: DEFAULT_BUS_ADDRESS,
        intro_on_boot: true,
        power_up_delay_ms: DEFAULT_POWER_UP_DELAY_MS,
    };

    /// Check the configuration for values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_period_us == 0 {
            return Err(ConfigError::ZeroFramePeriod);
        }
        if self.after_image_us == 0 {
            return Err(ConfigError::ZeroAfterImage);
        }
        if !self.gamma.is_finite() || self.gamma <= 0.0 || self.gamma > 8.0 {
            return Err(ConfigError::InvalidGamma);
        }
        if self.bus_address > 0x7F {
            return Err(ConfigError::InvalidBusAddress);
        }
        Ok(())
    }

    /// Nominal duration of one full multiplexing pass over `digits` positions
    pub fn pass_period_us(&self, digits: usize) -> u32 {
        digits as u32 * (self.frame_period_us as u32 + self.after_image_us as u32)
    }
}
