//! Display line pin grouping
//!
//! Collects the board's GPIOs for the lamp lines so the firmware can hand
//! them over in one piece.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;
use nixie_core::scheduler::BCD_LINES;
use nixie_core::DisplayLines;

use crate::gpio::Rp2040Output;

/// Raw pins for every multiplexed display line
///
/// `anodes[p]` powers position `p`, counted from the left.
pub struct DisplayPins<const N: usize> {
    pub bcd: [Peri<'static, AnyPin>; BCD_LINES],
    pub anodes: [Peri<'static, AnyPin>; N],
    pub points: [Peri<'static, AnyPin>; 2],
    pub left_comma: Peri<'static, AnyPin>,
    pub right_comma: Peri<'static, AnyPin>,
}

impl<const N: usize> DisplayPins<N> {
    /// Configure every pin as an output, driven low
    pub fn into_lines(self) -> DisplayLines<Rp2040Output, N> {
        DisplayLines {
            bcd: self.bcd.map(Rp2040Output::new),
            anodes: self.anodes.map(Rp2040Output::new),
            points: self.points.map(Rp2040Output::new),
            left_comma: Rp2040Output::new(self.left_comma),
            right_comma: Rp2040Output::new(self.right_comma),
        }
    }
}
