//! Command byte decoding and encoding
//!
//! Commands are classified by bit pattern. The comma commands share the
//! top bit with digit-value commands, so they are matched first: their
//! prefixes would otherwise decode as digit addresses 6 and 7, which no
//! supported display has.

/// High nibble of a left-comma command
pub const CMD_LEFT_COMMA: u8 = 0xE0;
/// High nibble of a right-comma command
pub const CMD_RIGHT_COMMA: u8 = 0xF0;
/// Top bit marks a digit-value command
pub const CMD_DIGIT: u8 = 0x80;
/// Mode commands (exact bytes)
pub const CMD_POWER_OFF: u8 = 0x10;
pub const CMD_POWER_ON: u8 = 0x11;
pub const CMD_INTRO_ON: u8 = 0x12;
/// Request a frame swap
pub const CMD_FINISH: u8 = 0x20;
/// Ignored operand
pub const CMD_NOOP: u8 = 0x30;
/// Currently behaves as a no-op
pub const CMD_START: u8 = 0x40;
/// Low nibble selects the point lamp
pub const CMD_POINT: u8 = 0x50;
/// Low nibble is the duty cycle
pub const CMD_DUTY: u8 = 0x60;

const HIGH_NIBBLE: u8 = 0xF0;
const LOW_NIBBLE: u8 = 0x0F;
const DIGIT_ADDRESS: u8 = 0x70;

/// Number of stand-alone point lamps
pub const POINT_COUNT: u8 = 2;

/// Largest duty cycle value (full brightness)
pub const MAX_DUTY: u8 = 15;

/// Reasons a command byte is rejected
///
/// All of them are reported to the host as the same FAIL status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Digit or comma address at or beyond the configured digit count
    AddressOutOfRange,
    /// Operand outside its legal set (point index not 0 or 1)
    InvalidOperand,
    /// Byte matches no command pattern
    UnrecognizedCommand,
}

/// A decoded bus command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Select digit `address` and set its pending value (0-15, >= 10 blanks)
    Digit { address: u8, value: u8 },
    /// Switch the high-voltage supply off
    PowerOff,
    /// Switch the high-voltage supply on
    PowerOn,
    /// Hand the lamps to the intro animation
    IntroOn,
    /// Request a pending → active swap at the end of the current pass
    Finish,
    /// Accepted, no effect
    Noop,
    /// Accepted, no effect
    Start,
    /// Light point lamp 0 or 1 in the pending frame
    Point(u8),
    /// Duty cycle (0-15) for the currently selected digit
    Duty(u8),
    /// Select and set the left comma of digit `address`
    LeftComma(u8),
    /// Select and set the right comma of digit `address`
    RightComma(u8),
}

impl Command {
    /// Decode a command byte
    ///
    /// Only the operand shape is checked here. Address bounds depend on the
    /// display size and are checked by the decoder that owns the frame.
    pub fn parse(byte: u8) -> Result<Self, CommandError> {
        let operand = byte & LOW_NIBBLE;

        match byte & HIGH_NIBBLE {
            CMD_LEFT_COMMA => return Ok(Command::LeftComma(operand)),
            CMD_RIGHT_COMMA => return Ok(Command::RightComma(operand)),
            _ => {}
        }

        if byte & CMD_DIGIT != 0 {
            return Ok(Command::Digit {
                address: (byte & DIGIT_ADDRESS) >> 4,
                value: operand,
            });
        }

        match byte {
            CMD_POWER_OFF => return Ok(Command::PowerOff),
            CMD_POWER_ON => return Ok(Command::PowerOn),
            CMD_INTRO_ON => return Ok(Command::IntroOn),
            CMD_FINISH => return Ok(Command::Finish),
            _ => {}
        }

        match byte & HIGH_NIBBLE {
            CMD_NOOP => Ok(Command::Noop),
            CMD_START => Ok(Command::Start),
            CMD_POINT => {
                if operand < POINT_COUNT {
                    Ok(Command::Point(operand))
                } else {
                    Err(CommandError::InvalidOperand)
                }
            }
            CMD_DUTY => Ok(Command::Duty(operand)),
            _ => Err(CommandError::UnrecognizedCommand),
        }
    }

    /// Encode this command to its wire byte
    ///
    /// Operands are masked to their field width, so out-of-range values
    /// wrap rather than bleed into the opcode bits.
    pub fn to_byte(self) -> u8 {
        match self {
            Command::Digit { address, value } => {
                CMD_DIGIT | ((address << 4) & DIGIT_ADDRESS) | (value & LOW_NIBBLE)
            }
            Command::PowerOff => CMD_POWER_OFF,
            Command::PowerOn => CMD_POWER_ON,
            Command::IntroOn => CMD_INTRO_ON,
            Command::Finish => CMD_FINISH,
            Command::Noop => CMD_NOOP,
            Command::Start => CMD_START,
            Command::Point(index) => CMD_POINT | (index & LOW_NIBBLE),
            Command::Duty(duty) => CMD_DUTY | (duty & LOW_NIBBLE),
            Command::LeftComma(address) => CMD_LEFT_COMMA | (address & LOW_NIBBLE),
            Command::RightComma(address) => CMD_RIGHT_COMMA | (address & LOW_NIBBLE),
        }
    }

    /// Digit-value command
    pub const fn digit(address: u8, value: u8) -> Self {
        Command::Digit { address, value }
    }

    /// Blank digit command (value 15 drives no cathode)
    pub const fn blank(address: u8) -> Self {
        Command::Digit { address, value: 15 }
    }

    /// Returns true if this command switches a mode rather than
    /// touching the pending frame
    pub fn is_mode(&self) -> bool {
        matches!(
            self,
            Command::PowerOff | Command::PowerOn | Command::IntroOn
        )
    }
}

impl TryFrom<u8> for Command {
    type Error = CommandError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Command::parse(byte)
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> Self {
        cmd.to_byte()
    }
}
