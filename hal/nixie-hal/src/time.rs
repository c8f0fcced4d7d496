//! Time measurement abstractions
//!
//! The multiplexer measures how long each burst of pin writes took and
//! subtracts it from the following wait. It only needs a free-running
//! counter; waiting itself goes through `embedded_hal::delay::DelayNs`.

/// Microsecond timestamp or duration
pub type Micros = u64;

/// Monotonic microsecond clock
pub trait Clock {
    /// Current timestamp in microseconds since an arbitrary epoch
    ///
    /// Must never go backwards.
    fn now_us(&self) -> Micros;

    /// Microseconds elapsed since `start`
    fn elapsed_since(&self, start: Micros) -> Micros {
        self.now_us().saturating_sub(start)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> Micros {
        (**self).now_us()
    }
}
