//! Pending and active frame state
//!
//! The protocol side writes a [`PendingFrame`]; the multiplexer reads an
//! [`ActiveFrame`]. The only transfer between the two is
//! [`PendingFrame::take`] followed by [`ActiveFrame::from_pending`], which
//! the multiplexer performs at the end of a pass.

use nixie_protocol::{CommandError, MAX_DUTY, POINT_COUNT};

use crate::curve::{DutyCurve, SlotTiming};

/// BCD pattern that lights no cathode on the decoder
pub const BLANK_BCD: u8 = 0x0F;

/// What a digit position shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DigitValue {
    /// Nothing is driven for this position
    #[default]
    Off,
    /// Decimal digit 0-9
    Digit(u8),
}

impl DigitValue {
    /// Interpret a command nibble; 10 and above blank the lamp
    pub fn from_nibble(value: u8) -> Self {
        if value < 10 {
            DigitValue::Digit(value)
        } else {
            DigitValue::Off
        }
    }

    /// BCD pattern to drive, if any
    pub fn bcd(self) -> Option<u8> {
        match self {
            DigitValue::Digit(d) => Some(d),
            DigitValue::Off => None,
        }
    }

    pub fn is_lit(self) -> bool {
        matches!(self, DigitValue::Digit(_))
    }
}

/// Frame being assembled by the command decoder
///
/// Every field reverts to its default after each swap; the protocol is
/// frame-stateless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingFrame<const N: usize> {
    pub digits: [DigitValue; N],
    pub duty: [u8; N],
    pub points: [bool; POINT_COUNT as usize],
    pub left_commas: [bool; N],
    pub right_commas: [bool; N],
}

impl<const N: usize> Default for PendingFrame<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PendingFrame<N> {
    /// Blank, full brightness, no points or commas
    pub const fn new() -> Self {
        Self {
            digits: [DigitValue::Off; N],
            duty: [MAX_DUTY; N],
            points: [false; POINT_COUNT as usize],
            left_commas: [false; N],
            right_commas: [false; N],
        }
    }

    fn check_address(address: u8) -> Result<usize, CommandError> {
        let index = address as usize;
        if index < N {
            Ok(index)
        } else {
            Err(CommandError::AddressOutOfRange)
        }
    }

    /// Set the value of a digit
    ///
    /// A digit whose duty is already 0 stays off.
    pub fn set_digit(&mut self, address: u8, value: u8) -> Result<(), CommandError> {
        let index = Self::check_address(address)?;
        self.digits[index] = if self.duty[index] == 0 {
            DigitValue::Off
        } else {
            DigitValue::from_nibble(value)
        };
        Ok(())
    }

    /// Set the duty cycle of a digit; duty 0 blanks it
    pub fn set_duty(&mut self, address: u8, duty: u8) -> Result<(), CommandError> {
        let index = Self::check_address(address)?;
        let duty = duty.min(MAX_DUTY);
        self.duty[index] = duty;
        if duty == 0 {
            self.digits[index] = DigitValue::Off;
        }
        Ok(())
    }

    /// Light one of the two point lamps
    pub fn set_point(&mut self, index: u8) -> Result<(), CommandError> {
        if index >= POINT_COUNT {
            return Err(CommandError::InvalidOperand);
        }
        self.points[index as usize] = true;
        Ok(())
    }

    pub fn set_left_comma(&mut self, address: u8) -> Result<(), CommandError> {
        let index = Self::check_address(address)?;
        self.left_commas[index] = true;
        Ok(())
    }

    pub fn set_right_comma(&mut self, address: u8) -> Result<(), CommandError> {
        let index = Self::check_address(address)?;
        self.right_commas[index] = true;
        Ok(())
    }

    /// Move the frame out and leave the defaults behind
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::new())
    }
}

/// Frame currently on the lamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActiveFrame<const N: usize> {
    pub digits: [DigitValue; N],
    pub timings: [SlotTiming; N],
    pub points: [bool; POINT_COUNT as usize],
    pub left_commas: [bool; N],
    pub right_commas: [bool; N],
}

impl<const N: usize> ActiveFrame<N> {
    /// Power-up state: nothing lit, full-period timing
    pub const fn blank(frame_period_us: u16) -> Self {
        Self {
            digits: [DigitValue::Off; N],
            timings: [SlotTiming::full(frame_period_us); N],
            points: [false; POINT_COUNT as usize],
            left_commas: [false; N],
            right_commas: [false; N],
        }
    }

    /// Promote a pending frame, translating duty values through the curve
    pub fn from_pending(pending: &PendingFrame<N>, curve: &DutyCurve) -> Self {
        let mut digits = pending.digits;
        let mut timings = [SlotTiming::default(); N];
        for (index, timing) in timings.iter_mut().enumerate() {
            let duty = pending.duty[index];
            if duty == 0 {
                digits[index] = DigitValue::Off;
            }
            *timing = curve.timing(duty);
        }

        Self {
            digits,
            timings,
            points: pending.points,
            left_commas: pending.left_commas,
            right_commas: pending.right_commas,
        }
    }

    /// Anything to show at `address` (number or comma)?
    pub fn has_content(&self, address: usize) -> bool {
        self.digits[address].is_lit() || self.left_commas[address] || self.right_commas[address]
    }
}
