//! UART serial device abstractions
//!
//! The transport drives the UART from inside its interrupt handler and only
//! needs a handful of status, data and enable bits. Chip HALs expose those
//! through [`SerialDevice`].

/// Lowest baud rate accepted when configuring the link
pub const MIN_BAUD_RATE: u32 = 100;

/// Highest baud rate accepted when configuring the link
pub const MAX_BAUD_RATE: u32 = 115_200;

/// Register-level view of a UART used as a byte sink/source
///
/// Methods take `&self`: the same register block is touched from the
/// interrupt handler (data and status) and from the main loop (arming the
/// transmit interrupt). Implementations are expected to be thin wrappers
/// around memory-mapped registers.
pub trait SerialDevice {
    /// Program the baud divisor and enable receiver and transmitter
    ///
    /// Called once, before any interrupt is enabled.
    fn configure(&self, config: &UartConfig);

    /// Enable the receive-data-ready interrupt
    fn enable_rx_interrupt(&self);

    /// A received byte is waiting in the data register
    fn rx_ready(&self) -> bool;

    /// Read the receive data register
    fn read_data(&self) -> u8;

    /// The receiver overrun flag is set
    fn overrun(&self) -> bool;

    /// Clear the receiver overrun flag
    fn clear_overrun(&self);

    /// The transmit data register can accept a byte
    fn tx_empty(&self) -> bool;

    /// Write the transmit data register
    fn write_data(&self, byte: u8);

    /// Enable or disable the transmit-buffer-empty interrupt
    fn set_tx_interrupt(&self, enabled: bool);
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl UartConfig {
    /// Create an 8N1 configuration with the given baud rate
    pub fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            ..Self::default()
        }
    }

    /// Check the baud rate against the supported range
    pub fn baudrate_valid(&self) -> bool {
        (MIN_BAUD_RATE..=MAX_BAUD_RATE).contains(&self.baudrate)
    }

    /// Baud rate divisor for a UART kernel clock, rounded to nearest
    ///
    /// Returns `None` for a zero baud rate.
    pub fn divisor(&self, kernel_clock_hz: u32) -> Option<u32> {
        if self.baudrate == 0 {
            return None;
        }
        let clock = kernel_clock_hz as u64;
        let baud = self.baudrate as u64;
        Some(((clock + baud / 2) / baud) as u32)
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
