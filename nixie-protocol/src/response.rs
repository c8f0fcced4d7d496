//! Status bytes returned for every command

use crate::command::CommandError;

/// Status byte for an accepted command
pub const RESP_SUCCESS: u8 = 0x00;

/// Status byte for a rejected command
pub const RESP_FAIL: u8 = 0b0101_0101;

/// Outcome of one command byte
///
/// The status is always computed. Whether it is read back depends on the
/// host; the firmware answers bus reads with the most recent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    #[default]
    Success,
    Fail,
}

impl Response {
    /// Wire byte for this status
    pub fn to_byte(self) -> u8 {
        match self {
            Response::Success => RESP_SUCCESS,
            Response::Fail => RESP_FAIL,
        }
    }

    /// Parse a status byte read back from the display
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            RESP_SUCCESS => Some(Response::Success),
            RESP_FAIL => Some(Response::Fail),
            _ => None,
        }
    }

    /// Collapse a command outcome into its status
    pub fn from_result<T>(result: Result<T, CommandError>) -> Self {
        match result {
            Ok(_) => Response::Success,
            Err(_) => Response::Fail,
        }
    }
}

impl<T> From<Result<T, CommandError>> for Response {
    fn from(result: Result<T, CommandError>) -> Self {
        Response::from_result(result)
    }
}
