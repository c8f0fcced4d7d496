//! Lamp line outputs

use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::Peri;
use nixie_hal::OutputPin;

/// Push-pull output starting low
pub struct Rp2040Output {
    pin: Output<'static>,
}

impl Rp2040Output {
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        Self {
            pin: Output::new(pin, Level::Low),
        }
    }
}

impl OutputPin for Rp2040Output {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn set_state(&mut self, high: bool) {
        self.pin.set_level(Level::from(high));
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
