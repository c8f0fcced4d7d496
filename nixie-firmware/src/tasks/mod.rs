//! Embassy async tasks
//!
//! Only the bus runs as a task; the multiplexer owns the thread-mode loop.

pub mod bus_rx;

pub use bus_rx::bus_rx_task;
