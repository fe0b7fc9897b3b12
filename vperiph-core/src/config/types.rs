//! Configuration type definitions

use vperiph_hal::uart::UartConfig;

/// Receive ring size in bytes (one slot stays free)
pub const RX_BUFFER_LEN: usize = 64;

/// Transmit ring size in bytes (one slot stays free)
pub const TX_BUFFER_LEN: usize = 128;

/// Number of virtual ADC channels on screen 0
pub const ADC_CHANNELS: usize = 2;

/// Default tick hook frequency
pub const TICKS_PER_SECOND: u32 = 1000;

/// Default link speed
pub const BAUD_RATE: u32 = 9600;

/// Runtime configuration of the virtual peripherals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Serial link speed in bits per second
    pub baud_rate: u32,
    /// Rate at which the firmware calls the tick hook
    pub ticks_per_second: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(BAUD_RATE, TICKS_PER_SECOND)
    }
}

impl Config {
    pub const fn new(baud_rate: u32, ticks_per_second: u32) -> Self {
        Self {
            baud_rate,
            ticks_per_second,
        }
    }

    /// 8N1 UART settings at the configured baud rate
    pub fn uart(&self) -> UartConfig {
        UartConfig::with_baudrate(self.baud_rate)
    }
}
