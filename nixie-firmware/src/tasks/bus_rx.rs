//! Command bus receive task
//!
//! Feeds every received byte to the shared decoder in arrival order, drives
//! the high-voltage enable line, and answers reads with the status of the
//! last processed command.

use defmt::*;
use embassy_rp::peripherals::I2C0;

use nixie_hal::OutputPin;
use nixie_hal_rp2040::{BusTarget, Rp2040Output};
use nixie_protocol::{Command, Response};

use crate::channels::DECODER;

/// Largest write handled in one transaction
const RX_BUF_SIZE: usize = 32;

/// Bus task - runs on the interrupt executor above the multiplexer
#[embassy_executor::task]
pub async fn bus_rx_task(mut bus: BusTarget<'static, I2C0>, mut hv_enable: Rp2040Output) {
    info!("Bus task started");

    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let transfer = match bus.next(&mut buf).await {
            Ok(transfer) => transfer,
            Err(e) => {
                warn!("Bus error: {:?}", e);
                continue;
            }
        };

        if transfer.written > 0 {
            trace!("RX: {} bytes", transfer.written);
            for &byte in &buf[..transfer.written] {
                handle_byte(byte);
            }

            let hv_enabled = DECODER.lock(|decoder| decoder.borrow().hv_enabled());
            if hv_enabled != hv_enable.is_set_high() {
                hv_enable.set_state(hv_enabled);
                info!("HV supply {}", if hv_enabled { "on" } else { "off" });
            }
        }

        if transfer.wants_read {
            let status = DECODER.lock(|decoder| decoder.borrow().last_response());
            if let Err(e) = bus.reply(status.to_byte()).await {
                warn!("Bus reply failed: {:?}", e);
            }
        }
    }
}

/// Apply one command byte and log the outcome
fn handle_byte(byte: u8) {
    let (response, cmd) = DECODER.lock(|decoder| decoder.borrow_mut().receive(byte));
    trace!("Command {=u8:#x} -> {:?}", byte, response);

    match (cmd, response) {
        (Some(cmd), Response::Success) if cmd.is_mode() || cmd == Command::Finish => {
            debug!("Accepted {:?}", cmd);
        }
        (_, Response::Fail) => {
            warn!("Rejected command byte {=u8:#x}", byte);
        }
        _ => {}
    }
}
