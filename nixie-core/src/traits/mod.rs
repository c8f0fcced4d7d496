//! Engine seams
//!
//! These traits define the interface between the multiplexer and whatever
//! feeds it frames.

pub mod frame_source;

pub use frame_source::FrameSource;
