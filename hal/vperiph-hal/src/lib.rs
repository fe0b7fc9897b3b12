//! vperiph Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction that chip-specific code
//! implements so the virtual peripheral link can run on different boards.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Firmware (application super loop)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  vperiph-core (transport, dispatcher)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  vperiph-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           chip UART register block
//! ```
//!
//! # Traits
//!
//! - [`uart::SerialDevice`] - interrupt-driven byte sink/source

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{SerialDevice, UartConfig};
