//! Physical display lines

use nixie_hal::OutputPin;
use nixie_protocol::POINT_COUNT;

/// Width of the digit pattern bus
pub const BCD_LINES: usize = 4;

/// Every output line the multiplexer drives
///
/// Anode `p` powers multiplexing position `p`, counted from the left. The
/// BCD and comma lines are shared by all positions; the point lamps are
/// stand-alone neon lamps timed with the first two positions.
pub struct DisplayLines<P, const N: usize> {
    /// BCD pattern, least-significant bit first
    pub bcd: [P; BCD_LINES],
    pub anodes: [P; N],
    pub points: [P; POINT_COUNT as usize],
    pub left_comma: P,
    pub right_comma: P,
}

impl<P: OutputPin, const N: usize> DisplayLines<P, N> {
    /// Drive every line to its inactive level
    pub fn all_low(&mut self) {
        for pin in self
            .bcd
            .iter_mut()
            .chain(self.anodes.iter_mut())
            .chain(self.points.iter_mut())
        {
            pin.set_low();
        }
        self.left_comma.set_low();
        self.right_comma.set_low();
    }

    /// Put a 4-bit pattern on the BCD lines
    pub fn write_bcd(&mut self, pattern: u8) {
        for (bit, pin) in self.bcd.iter_mut().enumerate() {
            pin.set_state(pattern & (1 << bit) != 0);
        }
    }
}
