//! Board configuration generated from display.toml
//!
//! `build.rs` validates display.toml and emits the digit count, the display
//! timing constants and one pin-taking macro per line group.

include!(concat!(env!("OUT_DIR"), "/config.rs"));
