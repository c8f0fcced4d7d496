//! Nixie Display Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the display engine is written
//! against. Chip-specific crates implement them; host tests implement them
//! with recording mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  nixie-core (multiplexer, decoder)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  nixie-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  nixie-hal-   │       │  test mocks   │
//! │    rp2040     │       │  (host only)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output lines (BCD, anodes, points, HV)
//! - [`time::Clock`] - Free-running microsecond counter for jitter measurement
//!
//! Busy-wait delays use `embedded_hal::delay::DelayNs` directly.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod time;

pub use gpio::OutputPin;
pub use time::{Clock, Micros};
