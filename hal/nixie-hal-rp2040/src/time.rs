//! Clock backed by the embassy time driver

use embassy_time::Instant;
use nixie_hal::{Clock, Micros};

/// Free-running microsecond clock
///
/// The RP2040 time driver ticks at 1 MHz, so this is exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_us(&self) -> Micros {
        Instant::now().as_micros()
    }
}
