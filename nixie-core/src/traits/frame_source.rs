//! Frame handoff from the protocol side to the multiplexer

use crate::decoder::{Decoder, IntroMode};
use crate::frame::PendingFrame;

/// The multiplexer's view of the protocol side
///
/// Called only at the end of a multiplexing pass, never mid-pass. On
/// hardware the decoder is shared with an interrupt-driven bus task, so an
/// implementation may need a critical section around each call; each call
/// is one short copy.
pub trait FrameSource<const N: usize> {
    /// Take the pending frame if a swap was requested, resetting it
    fn take_frame(&mut self) -> Option<PendingFrame<N>>;

    /// Current intro mode; a fresh request is acknowledged by this call
    fn poll_intro(&mut self) -> IntroMode;

    /// The intro animation completed its last pass
    fn finish_intro(&mut self);
}

impl<const N: usize> FrameSource<N> for Decoder<N> {
    fn take_frame(&mut self) -> Option<PendingFrame<N>> {
        Decoder::take_frame(self)
    }

    fn poll_intro(&mut self) -> IntroMode {
        Decoder::poll_intro(self)
    }

    fn finish_intro(&mut self) {
        Decoder::finish_intro(self)
    }
}

impl<const N: usize, S: FrameSource<N> + ?Sized> FrameSource<N> for &mut S {
    fn take_frame(&mut self) -> Option<PendingFrame<N>> {
        (**self).take_frame()
    }

    fn poll_intro(&mut self) -> IntroMode {
        (**self).poll_intro()
    }

    fn finish_intro(&mut self) {
        (**self).finish_intro()
    }
}
