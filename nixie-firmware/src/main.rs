//! Nixie display controller firmware
//!
//! Main firmware binary for RP2040-based multiplexed Nixie displays.
//!
//! Two execution contexts share the chip:
//!
//! - Thread mode runs the multiplexer forever, busy-waiting its bright, dim
//!   and after-image holds.
//! - The I2C bus task runs on an interrupt executor (SWI_IRQ_1) at a higher
//!   priority, so command bytes are decoded between multiplexer steps.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::InterruptExecutor;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c_slave::I2cSlave;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::I2C0;
use embassy_time::{block_for, Delay, Duration};
use {defmt_rtt as _, panic_probe as _};

use nixie_core::Multiplexer;
use nixie_hal::OutputPin;
use nixie_hal_rp2040::{BusTarget, EmbassyClock, Rp2040Output};

use crate::channels::SharedDecoder;
use crate::config::{DIGIT_COUNT, DISPLAY_CONFIG};

#[macro_use]
mod config;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => embassy_rp::i2c::InterruptHandler<I2C0>;
});

/// Executor for the bus task, preempting the multiplexer loop
static EXECUTOR_BUS: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_BUS.on_interrupt()
}

/// Main entry point
#[cortex_m_rt::entry]
fn main() -> ! {
    info!("Nixie firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Every lamp line comes up low before anything else runs
    let lines = display_pins!(p).into_lines();
    let mut hv_enable = Rp2040Output::new(hv_enable_pin!(p));
    let mut status_led = Rp2040Output::new(status_led_pin!(p));
    info!("Display lines initialized ({} digits)", DIGIT_COUNT);

    block_for(Duration::from_millis(DISPLAY_CONFIG.power_up_delay_ms as u64));
    hv_enable.set_high();
    info!("HV supply enabled");

    let i2c = I2cSlave::new(
        p.I2C0,
        p.PIN_1,
        p.PIN_0,
        Irqs,
        BusTarget::<I2C0>::config(DISPLAY_CONFIG.bus_address),
    );
    info!("I2C target at {=u8:#x}", DISPLAY_CONFIG.bus_address);

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = EXECUTOR_BUS.start(interrupt::SWI_IRQ_1);
    spawner
        .spawn(tasks::bus_rx_task(BusTarget::new(i2c), hv_enable))
        .unwrap();

    let mux = match Multiplexer::new(lines, EmbassyClock, Delay, &DISPLAY_CONFIG) {
        Ok(mux) => mux,
        Err(e) => defmt::panic!("Display config rejected: {:?}", e),
    };
    status_led.set_high();
    info!("Bring-up complete, multiplexing");

    mux.run(SharedDecoder)
}
