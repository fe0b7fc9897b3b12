//! Link and device configuration
//!
//! Buffer sizes and channel counts are compile-time constants used as
//! const-generic defaults; baud rate and tick frequency are chosen at run
//! time through [`Config`].

pub mod types;

pub use types::*;
