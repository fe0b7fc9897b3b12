//! Interrupt-driven byte transport
//!
//! Couples an RX and a TX [`RingBuffer`] to a [`SerialDevice`]. The
//! interrupt handler is the RX producer and the TX consumer; the main loop
//! is the RX consumer and the TX producer.
//!
//! ```text
//!  wire ──► on_interrupt ──► rx ring ──► read()   (main loop)
//!  wire ◄── on_interrupt ◄── tx ring ◄── write()  (main loop)
//! ```
//!
//! The transmit-empty interrupt is armed by `write` when the link was idle
//! and disarmed by the handler once the TX ring runs dry.

use core::convert::Infallible;

use portable_atomic::{AtomicBool, AtomicU32, Ordering};
use vperiph_hal::uart::{SerialDevice, UartConfig};

use super::ring_buffer::RingBuffer;
use crate::config::{RX_BUFFER_LEN, TX_BUFFER_LEN};

/// Transport initialisation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// `init` was already called once
    AlreadyInitialized,
    /// Requested baud rate is outside the supported range
    InvalidBaudRate,
}

/// Ring buffer low-water marks since the previous query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueStatistics {
    /// Fewest free RX slots seen
    pub rx_min_free: usize,
    /// Fewest free TX slots seen
    pub tx_min_free: usize,
}

/// Serial transport over a UART
pub struct Transport<D, const RX: usize = RX_BUFFER_LEN, const TX: usize = TX_BUFFER_LEN> {
    device: D,
    rx: RingBuffer<RX>,
    tx: RingBuffer<TX>,
    tx_armed: AtomicBool,
    initialized: AtomicBool,
    rx_dropped: AtomicU32,
}

impl<D, const RX: usize, const TX: usize> Transport<D, RX, TX> {
    /// Wrap a device; nothing is touched until [`Transport::init`]
    pub const fn new(device: D) -> Self {
        Self {
            device,
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
            tx_armed: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            rx_dropped: AtomicU32::new(0),
        }
    }

    /// Underlying device
    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Transmit-empty interrupt is currently enabled
    pub fn is_tx_armed(&self) -> bool {
        self.tx_armed.load(Ordering::Acquire)
    }

    /// Bytes lost because the RX ring was full
    pub fn rx_dropped(&self) -> u32 {
        self.rx_dropped.load(Ordering::Relaxed)
    }

    /// Low-water marks of both rings; restarts both marks
    pub fn statistics(&self) -> QueueStatistics {
        let stats = QueueStatistics {
            rx_min_free: self.rx.min_free(),
            tx_min_free: self.tx.min_free(),
        };
        self.rx.reset_statistics();
        self.tx.reset_statistics();
        stats
    }

    /// Non-blocking read of one received byte
    pub fn read(&self) -> Option<u8> {
        self.rx.dequeue()
    }

    /// Bytes received but not yet read
    pub fn rx_pending(&self) -> usize {
        self.rx.len()
    }

    /// Bytes queued but not yet handed to the device
    pub fn tx_pending(&self) -> usize {
        self.tx.len()
    }
}

impl<D: SerialDevice, const RX: usize, const TX: usize> Transport<D, RX, TX> {
    /// Configure the UART and enable the receive interrupt
    ///
    /// One-shot. A second call fails with `AlreadyInitialized`; an invalid
    /// baud rate fails with `InvalidBaudRate`. Neither failure touches the
    /// device.
    pub fn init(&self, config: &UartConfig) -> Result<(), TransportError> {
        if self.initialized.load(Ordering::Acquire) {
            warn!("transport: already initialised");
            return Err(TransportError::AlreadyInitialized);
        }
        if !config.baudrate_valid() {
            warn!("transport: invalid baud rate {}", config.baudrate);
            return Err(TransportError::InvalidBaudRate);
        }

        self.initialized.store(true, Ordering::Release);
        self.rx.reset();
        self.tx.reset();
        self.tx_armed.store(false, Ordering::Release);
        self.rx_dropped.store(0, Ordering::Relaxed);

        self.device.configure(config);
        self.device.enable_rx_interrupt();

        info!("transport: up at {} baud", config.baudrate);
        Ok(())
    }

    /// Queue one byte for transmission
    ///
    /// Spins while the TX ring is full. The interrupt handler must be able
    /// to run meanwhile, otherwise this never returns.
    pub fn write(&self, byte: u8) {
        while !self.tx.enqueue(byte) {
            core::hint::spin_loop();
        }

        if !self.tx_armed.load(Ordering::Acquire) {
            self.tx_armed.store(true, Ordering::Release);
            self.device.set_tx_interrupt(true);
        }
    }

    /// Queue a run of bytes, spinning as needed
    pub fn write_all(&self, bytes: &[u8]) {
        bytes.iter().for_each(|&b| self.write(b));
    }

    /// UART interrupt handler body
    ///
    /// Must be called from the single UART interrupt context only.
    pub fn on_interrupt(&self) {
        if self.device.overrun() {
            self.device.clear_overrun();
        }

        while self.device.rx_ready() {
            let byte = self.device.read_data();
            if !self.rx.enqueue(byte) {
                let dropped = self.rx_dropped.load(Ordering::Relaxed);
                self.rx_dropped.store(dropped.wrapping_add(1), Ordering::Relaxed);
                trace!("transport: rx ring full, byte dropped");
            }
        }

        if self.device.tx_empty() {
            match self.tx.dequeue() {
                Some(byte) => self.device.write_data(byte),
                None => {
                    self.device.set_tx_interrupt(false);
                    self.tx_armed.store(false, Ordering::Release);
                }
            }
        }
    }

    /// Blocking [`embedded_io::Write`] adapter
    pub fn writer(&self) -> Writer<'_, D, RX, TX> {
        Writer { transport: self }
    }
}

/// Blocking writer over a [`Transport`]
pub struct Writer<'a, D, const RX: usize, const TX: usize> {
    transport: &'a Transport<D, RX, TX>,
}

impl<D, const RX: usize, const TX: usize> embedded_io::ErrorType for Writer<'_, D, RX, TX> {
    type Error = Infallible;
}

impl<D: SerialDevice, const RX: usize, const TX: usize> embedded_io::Write
    for Writer<'_, D, RX, TX>
{
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.transport.write_all(buf);
        Ok(buf.len())
    }

    /// Spin until the TX ring has been handed to the device
    fn flush(&mut self) -> Result<(), Self::Error> {
        while !self.transport.tx.is_empty() {
            core::hint::spin_loop();
        }
        Ok(())
    }
}

impl<D: SerialDevice, const RX: usize, const TX: usize> core::fmt::Write
    for Writer<'_, D, RX, TX>
{
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.transport.write_all(s.as_bytes());
        Ok(())
    }
}
