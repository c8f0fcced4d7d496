//! I2C target for the command bus
//!
//! The controller only ever writes command bytes and reads back one status
//! byte. [`BusTarget`] reduces the embassy target driver to those two
//! operations.

use embassy_rp::i2c::{AbortReason, Instance};
use embassy_rp::i2c_slave::{self, Command, I2cSlave};

/// Bus errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The controller aborted the transfer
    Aborted,
    /// Arbitration lost or NAK while responding
    Lost,
    /// Response buffer rejected by the driver
    InvalidResponse,
}

impl From<i2c_slave::Error> for BusError {
    fn from(e: i2c_slave::Error) -> Self {
        match e {
            i2c_slave::Error::Abort(AbortReason::ArbitrationLoss)
            | i2c_slave::Error::Abort(AbortReason::NoAcknowledge) => BusError::Lost,
            i2c_slave::Error::InvalidResponseBufferLength => BusError::InvalidResponse,
            _ => BusError::Aborted,
        }
    }
}

/// One completed controller transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transfer {
    /// Bytes written into the receive buffer
    pub written: usize,
    /// The controller is waiting for a status byte
    pub wants_read: bool,
}

/// Target-side command bus
pub struct BusTarget<'d, T: Instance> {
    i2c: I2cSlave<'d, T>,
}

impl<'d, T: Instance> BusTarget<'d, T> {
    pub fn new(i2c: I2cSlave<'d, T>) -> Self {
        Self { i2c }
    }

    /// Driver configuration for a 7-bit target address
    ///
    /// General calls are not answered; the board has its own pull-ups.
    pub fn config(address: u8) -> i2c_slave::Config {
        let mut config = i2c_slave::Config::default();
        config.addr = address as u16;
        config.general_call = false;
        config.scl_pullup = false;
        config.sda_pullup = false;
        config
    }

    /// Wait for the next transaction addressed to us
    ///
    /// Bytes of a write that overflowed `buffer` are dropped, but the ones
    /// that fit are still reported so no accepted command is lost.
    pub async fn next(&mut self, buffer: &mut [u8]) -> Result<Transfer, BusError> {
        let transfer = match self.i2c.listen(buffer).await {
            Ok(Command::Write(len)) => Transfer {
                written: len,
                wants_read: false,
            },
            Ok(Command::WriteRead(len)) => Transfer {
                written: len,
                wants_read: true,
            },
            Ok(Command::Read) => Transfer {
                written: 0,
                wants_read: true,
            },
            Ok(Command::GeneralCall(_)) => Transfer {
                written: 0,
                wants_read: false,
            },
            Err(i2c_slave::Error::PartialWrite(len)) => Transfer {
                written: len,
                wants_read: false,
            },
            Err(e) => return Err(e.into()),
        };
        Ok(transfer)
    }

    /// Answer a read with `status`, repeated for as many bytes as are clocked
    pub async fn reply(&mut self, status: u8) -> Result<(), BusError> {
        self.i2c.respond_and_fill(&[status], status).await?;
        Ok(())
    }
}
