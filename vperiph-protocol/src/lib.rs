//! Virtual Peripheral Protocol
//!
//! This crate defines the serial text protocol between the firmware and the
//! visualizer process that draws the virtual LEDs, switches, buttons, ADC
//! sliders, clock and exercise screens.
//!
//! # Protocol Overview
//!
//! Every message is one ASCII line terminated by `\n` or `\r`:
//! ```text
//! ┌─────┬──────┬──────────────────┬────┐
//! │ TAG │ ITEM │ PAYLOAD          │ LF │
//! │ 1B  │ 1B   │ 0–30B hex / dec  │ 1B │
//! └─────┴──────┴──────────────────┴────┘
//! ```
//!
//! - `d` sets a value (`d01ff` sets the switches on screen 0)
//! - `?` requests a value (`?S` asks for the current screen)
//! - `e` reports an error, echoing the offending line (`e04d1`)
//!
//! Numeric payloads are fixed-width lowercase hex, except the time stamp
//! which is 14 decimal digits (`YYYYMMDDHHMMSS`).

#![no_std]
#![deny(unsafe_code)]

pub mod codec;
pub mod error;
pub mod line;
pub mod message;
pub mod outbound;
pub mod time;

pub use error::ErrorCode;
pub use line::{LineAssembler, LineError, MAX_LINE_LEN};
pub use message::{Message, Request, SetCommand};
pub use outbound::{Outbound, Query, SeesawFrame};
pub use time::TimeOfDay;
