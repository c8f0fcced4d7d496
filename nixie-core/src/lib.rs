//! Board-agnostic display engine for the Nixie display controller
//!
//! This crate contains everything between the bus and the lamp lines that
//! does not depend on a specific chip:
//!
//! - Display configuration and digit-count validation
//! - Duty-cycle → bright/dim timing curve
//! - Pending and active frame state
//! - Command decoder with selection cursors
//! - Multiplexing scheduler with jitter compensation
//! - Intro animation
//!
//! Data flows one way:
//!
//! ```text
//! bus byte → Decoder → PendingFrame ──(FINISH, end of pass)──► ActiveFrame → Multiplexer → lines
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod curve;
pub mod decoder;
pub mod frame;
pub mod intro;
pub mod scheduler;
pub mod traits;

pub use config::{ConfigError, DigitCount, DisplayConfig};
pub use curve::{duty_to_timing, DutyCurve, SlotTiming};
pub use decoder::{Decoder, IntroMode, SelectionCursors};
pub use frame::{ActiveFrame, DigitValue, PendingFrame};
pub use intro::IntroAnimation;
pub use scheduler::{DisplayLines, Multiplexer, PassReport};
pub use traits::FrameSource;
