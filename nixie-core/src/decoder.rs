//! Command decoder
//!
//! Owns the pending frame and the selection cursors, and applies one
//! command byte at a time. Address-less commands (duty cycle) act on the
//! digit selected by the last digit-value command.
//!
//! A rejected byte changes nothing except the intro mode: any byte other
//! than INTRO-ON hands the lamps back to the host.

use nixie_protocol::{Command, CommandError, Response};

use crate::config::{DigitCount, DisplayConfig};
use crate::frame::PendingFrame;

/// "Last addressed target" registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelectionCursors {
    /// Digit targeted by subsequent duty-cycle commands
    pub digit: u8,
    pub left_comma: u8,
    pub right_comma: u8,
}

/// Intro animation ownership of the lamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntroMode {
    /// Host frames drive the lamps
    Off,
    /// Start (or restart) the animation at the next pass boundary
    Requested,
    /// Animation is writing the active frame every pass
    Running,
}

/// Bus command decoder and pending-frame owner
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decoder<const N: usize> {
    pending: PendingFrame<N>,
    cursors: SelectionCursors,
    swap_requested: bool,
    hv_enabled: bool,
    intro: IntroMode,
    last_response: Response,
}

impl<const N: usize> Default for Decoder<N> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<const N: usize> Decoder<N> {
    /// Create a decoder with blank pending state and the HV supply on
    pub const fn new(intro_on_boot: bool) -> Self {
        let () = DigitCount::<N>::OK;
        Self {
            pending: PendingFrame::new(),
            cursors: SelectionCursors {
                digit: 0,
                left_comma: 0,
                right_comma: 0,
            },
            swap_requested: false,
            hv_enabled: true,
            intro: if intro_on_boot {
                IntroMode::Requested
            } else {
                IntroMode::Off
            },
            last_response: Response::Success,
        }
    }

    pub const fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.intro_on_boot)
    }

    /// Decode and apply one bus byte
    pub fn handle_byte(&mut self, byte: u8) -> Response {
        self.receive(byte).0
    }

    /// Decode and apply one bus byte, also handing back what it decoded to
    ///
    /// The command is `None` only for bytes that match no pattern; a
    /// decoded command can still fail (address out of range).
    pub fn receive(&mut self, byte: u8) -> (Response, Option<Command>) {
        let (result, cmd) = match Command::parse(byte) {
            Ok(cmd) => (self.apply(cmd), Some(cmd)),
            Err(e) => {
                self.intro = IntroMode::Off;
                (Err(e), None)
            }
        };
        self.last_response = Response::from_result(result);
        (self.last_response, cmd)
    }

    /// Apply an already-decoded command
    pub fn apply(&mut self, cmd: Command) -> Result<(), CommandError> {
        if cmd != Command::IntroOn {
            self.intro = IntroMode::Off;
        }

        match cmd {
            Command::Digit { address, value } => {
                self.pending.set_digit(address, value)?;
                self.cursors.digit = address;
            }
            Command::Finish => {
                self.swap_requested = true;
            }
            Command::Noop | Command::Start => {}
            Command::Point(index) => {
                self.pending.set_point(index)?;
            }
            Command::Duty(duty) => {
                self.pending.set_duty(self.cursors.digit, duty)?;
            }
            Command::LeftComma(address) => {
                self.pending.set_left_comma(address)?;
                self.cursors.left_comma = address;
            }
            Command::RightComma(address) => {
                self.pending.set_right_comma(address)?;
                self.cursors.right_comma = address;
            }
            Command::PowerOff => {
                self.hv_enabled = false;
            }
            Command::PowerOn => {
                self.hv_enabled = true;
            }
            Command::IntroOn => {
                self.intro = IntroMode::Requested;
            }
        }

        Ok(())
    }

    /// Hand over the pending frame if a FINISH arrived since the last call
    ///
    /// Resets the pending frame to defaults and the digit cursor to 0.
    pub fn take_frame(&mut self) -> Option<PendingFrame<N>> {
        if !self.swap_requested {
            return None;
        }
        self.swap_requested = false;
        self.cursors.digit = 0;
        Some(self.pending.take())
    }

    /// Report the intro mode, moving a fresh request to `Running`
    pub fn poll_intro(&mut self) -> IntroMode {
        let mode = self.intro;
        if mode == IntroMode::Requested {
            self.intro = IntroMode::Running;
        }
        mode
    }

    /// The animation ran to its last pass
    pub fn finish_intro(&mut self) {
        if self.intro == IntroMode::Running {
            self.intro = IntroMode::Off;
        }
    }

    pub fn pending(&self) -> &PendingFrame<N> {
        &self.pending
    }

    pub fn cursors(&self) -> SelectionCursors {
        self.cursors
    }

    pub fn swap_requested(&self) -> bool {
        self.swap_requested
    }

    /// Requested state of the high-voltage supply line
    pub fn hv_enabled(&self) -> bool {
        self.hv_enabled
    }

    pub fn intro_mode(&self) -> IntroMode {
        self.intro
    }

    /// Status of the most recent byte
    pub fn last_response(&self) -> Response {
        self.last_response
    }
}
