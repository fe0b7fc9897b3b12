//! Line assembly for the text protocol
//!
//! Bytes arrive one at a time from the transport. A line ends at `\n` or
//! `\r`; empty lines (the second half of a CR LF pair) produce nothing.
//! A line longer than the buffer is dropped in full, up to and including
//! its terminator, so a resync happens on the next line boundary.

use heapless::Vec;

/// Maximum line length in bytes, terminator excluded
pub const MAX_LINE_LEN: usize = 32;

/// Errors that can occur while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded the buffer; it is discarded up to the next terminator
    Overflow,
}

/// Returns true for the bytes that end a line
pub fn is_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

/// Bounded accumulator turning a byte stream into lines
#[derive(Debug, Clone, Default)]
pub struct LineAssembler<const N: usize = MAX_LINE_LEN> {
    buffer: Vec<u8, N>,
    discarding: bool,
}

impl<const N: usize> LineAssembler<N> {
    /// Create an empty assembler
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Number of bytes in the partial line
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// No partial line is pending
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// An overlong line is being skipped
    pub fn is_discarding(&self) -> bool {
        self.discarding
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a non-empty line,
    /// `Ok(None)` when more bytes are needed, and `Err(Overflow)` once for
    /// the byte that overflows the buffer.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Vec<u8, N>>, LineError> {
        if is_terminator(byte) {
            if self.discarding {
                self.reset();
                return Ok(None);
            }
            if self.buffer.is_empty() {
                return Ok(None);
            }
            return Ok(Some(core::mem::take(&mut self.buffer)));
        }

        if self.discarding {
            return Ok(None);
        }

        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.discarding = true;
            return Err(LineError::Overflow);
        }
        Ok(None)
    }

    /// Feed multiple bytes
    ///
    /// Returns the first complete line found, if any. Bytes after it are
    /// not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Vec<u8, N>>, LineError> {
        for &byte in bytes {
            if let Some(line) = self.feed(byte)? {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}
