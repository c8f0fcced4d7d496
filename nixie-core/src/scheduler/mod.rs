//! Multiplexing scheduler
//!
//! Drives the lamp lines one digit position at a time, forever, and is the
//! only place where the active frame changes.

pub mod lines;
pub mod multiplexer;

pub use lines::{DisplayLines, BCD_LINES};
pub use multiplexer::{Multiplexer, PassReport};
