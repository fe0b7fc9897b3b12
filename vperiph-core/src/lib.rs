//! Board-agnostic core of the virtual peripheral link
//!
//! This crate contains everything between the UART registers and the
//! firmware's main loop that does not depend on a specific chip:
//!
//! - Lock-free SPSC ring buffers and the interrupt-driven transport
//! - Line dispatcher for the visualizer protocol
//! - Device state: screen, LEDs, switches, buttons, ADC, wall clock
//! - The [`VirtualPeripherals`] API used by the firmware
//!
//! A chip HAL provides a [`vperiph_hal::SerialDevice`]; the firmware
//! places a [`Transport`] and a [`TickCounter`] in statics, calls
//! [`Transport::on_interrupt`] from the UART interrupt and
//! [`TickCounter::tick`] from a periodic timer interrupt.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod log;

pub mod config;
pub mod dispatch;
pub mod link;
pub mod peripherals;
pub mod state;

pub use config::Config;
pub use dispatch::{dispatch, Outcome, PeerFault};
pub use link::{QueueStatistics, RingBuffer, Transport, TransportError};
pub use peripherals::{ApiError, VirtualPeripherals};
pub use state::{DeviceState, TickCounter};
