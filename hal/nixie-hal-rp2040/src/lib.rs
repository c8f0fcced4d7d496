//! RP2040-specific HAL for the Nixie display controller
//!
//! Implements the shared `nixie-hal` traits on top of `embassy-rp`, plus the
//! RP2040-specific pieces of the board:
//!
//! - Push-pull lamp outputs (implements `nixie_hal::OutputPin`)
//! - Microsecond clock from the embassy time driver (implements `nixie_hal::Clock`)
//! - Pin grouping for the display lines
//! - I2C target wrapper for the command bus

#![no_std]

pub mod gpio;
pub mod i2c;
pub mod pins;
pub mod time;

pub use gpio::Rp2040Output;
pub use i2c::{BusError, BusTarget, Transfer};
pub use pins::DisplayPins;
pub use time::EmbassyClock;
