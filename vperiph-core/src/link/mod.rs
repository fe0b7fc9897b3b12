//! Serial link: lock-free rings and the interrupt-driven transport

pub mod ring_buffer;
pub mod transport;

pub use ring_buffer::RingBuffer;
pub use transport::{QueueStatistics, Transport, TransportError, Writer};
