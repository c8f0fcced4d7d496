//! Nixie Display Command Protocol
//!
//! This crate defines the byte protocol between a host and the display
//! controller on the I2C bus. Every command is exactly one byte and every
//! command produces exactly one status byte.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌──────────────┬───────────────────────────────────────────┐
//! │ 1AAA VVVV    │ digit AAA shows value VVVV (>= 10 blanks) │
//! │ 0001 0000    │ high-voltage supply off                   │
//! │ 0001 0001    │ high-voltage supply on                    │
//! │ 0001 0010    │ intro animation on                        │
//! │ 0010 0000    │ finish frame (swap pending → active)      │
//! │ 0011 xxxx    │ no-op                                     │
//! │ 0100 xxxx    │ start (no-op)                             │
//! │ 0101 000P    │ light point lamp P                        │
//! │ 0110 DDDD    │ duty cycle of the last selected digit     │
//! │ 1110 AAAA    │ left comma at digit AAAA                  │
//! │ 1111 AAAA    │ right comma at digit AAAA                 │
//! └──────────────┴───────────────────────────────────────────┘
//! ```
//!
//! The protocol is frame-stateless: a host resends every digit it wants lit
//! before each FINISH. Decoding is total over `u8`; anything unmatched is a
//! [`CommandError::UnrecognizedCommand`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod response;

pub use command::{Command, CommandError, MAX_DUTY, POINT_COUNT};
pub use response::{Response, RESP_FAIL, RESP_SUCCESS};
