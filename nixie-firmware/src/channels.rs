//! State shared between the bus task and the multiplexer
//!
//! The bus task is the only writer of the pending frame; the multiplexer
//! only touches it at the end of a pass. Both sides take the critical
//! section for a single short call, so the lamp timing never waits on the
//! bus for more than one frame copy.

use core::cell::RefCell;

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use nixie_core::{Decoder, FrameSource, IntroMode, PendingFrame};

use crate::config::{DIGIT_COUNT, DISPLAY_CONFIG};

/// Command decoder owning the pending frame
pub static DECODER: Mutex<CriticalSectionRawMutex, RefCell<Decoder<DIGIT_COUNT>>> =
    Mutex::new(RefCell::new(Decoder::from_config(&DISPLAY_CONFIG)));

/// The multiplexer's handle on [`DECODER`]
pub struct SharedDecoder;

impl FrameSource<DIGIT_COUNT> for SharedDecoder {
    fn take_frame(&mut self) -> Option<PendingFrame<DIGIT_COUNT>> {
        DECODER.lock(|decoder| decoder.borrow_mut().take_frame())
    }

    fn poll_intro(&mut self) -> IntroMode {
        DECODER.lock(|decoder| decoder.borrow_mut().poll_intro())
    }

    fn finish_intro(&mut self) {
        DECODER.lock(|decoder| decoder.borrow_mut().finish_intro());
        info!("Intro finished");
    }
}
