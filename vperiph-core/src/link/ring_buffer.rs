//! Lock-free single-producer/single-consumer byte queue
//!
//! One context enqueues, one context dequeues, for the whole life of the
//! buffer. The producer only ever stores the write index and the consumer
//! only ever stores the read index, so each side sees the other's progress
//! through a single aligned word write and no lock is needed. Using the
//! same buffer from two producers or two consumers is not supported.
//!
//! One slot is kept free to tell "full" from "empty", so a buffer of `N`
//! slots holds at most `N - 1` bytes.

use portable_atomic::{AtomicU8, AtomicUsize, Ordering};

/// Fixed-capacity FIFO of bytes with wrap-around indices
pub struct RingBuffer<const N: usize> {
    slots: [AtomicU8; N],
    read: AtomicUsize,
    write: AtomicUsize,
    /// Lowest free-slot count seen by the producer since the last reset
    min_free: AtomicUsize,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    const VALID: () = assert!(N >= 2, "ring buffer needs at least two slots");

    /// Create an empty buffer
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;
        Self {
            slots: [const { AtomicU8::new(0) }; N],
            read: AtomicUsize::new(0),
            write: AtomicUsize::new(0),
            min_free: AtomicUsize::new(N - 1),
        }
    }

    /// Empty the buffer and reset the statistics
    ///
    /// Only valid while neither producer nor consumer is running, e.g.
    /// before the interrupt that feeds it is enabled.
    pub fn reset(&self) {
        self.read.store(0, Ordering::Release);
        self.write.store(0, Ordering::Release);
        self.reset_statistics();
    }

    /// Number of bytes the buffer can hold
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    #[inline]
    fn next(index: usize) -> usize {
        if index + 1 == N {
            0
        } else {
            index + 1
        }
    }

    /// No byte can be enqueued
    pub fn is_full(&self) -> bool {
        Self::next(self.write.load(Ordering::Acquire)) == self.read.load(Ordering::Acquire)
    }

    /// No byte can be dequeued
    pub fn is_empty(&self) -> bool {
        self.write.load(Ordering::Acquire) == self.read.load(Ordering::Acquire)
    }

    /// Number of bytes waiting
    pub fn len(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        (write + N - read) % N
    }

    /// Number of bytes that can still be enqueued
    pub fn free_slots(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Append a byte (producer side)
    ///
    /// Returns `false` and stores nothing if the buffer is full. Never
    /// blocks and never overwrites.
    #[must_use]
    pub fn enqueue(&self, byte: u8) -> bool {
        let write = self.write.load(Ordering::Relaxed);
        let next = Self::next(write);
        let read = self.read.load(Ordering::Acquire);
        if next == read {
            return false;
        }

        self.slots[write].store(byte, Ordering::Relaxed);
        self.write.store(next, Ordering::Release);

        let free = (read + N - next - 1) % N;
        if free < self.min_free.load(Ordering::Relaxed) {
            self.min_free.store(free, Ordering::Relaxed);
        }
        true
    }

    /// Remove the oldest byte (consumer side)
    pub fn dequeue(&self) -> Option<u8> {
        let read = self.read.load(Ordering::Relaxed);
        if read == self.write.load(Ordering::Acquire) {
            return None;
        }

        let byte = self.slots[read].load(Ordering::Relaxed);
        self.read.store(Self::next(read), Ordering::Release);
        Some(byte)
    }

    /// Lowest number of free slots observed since the last reset
    pub fn min_free(&self) -> usize {
        self.min_free.load(Ordering::Relaxed)
    }

    /// Restart the low-water mark at full capacity
    pub fn reset_statistics(&self) {
        self.min_free.store(self.capacity(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    #[test]
    fn test_empty_after_new() {
        let ring = RingBuffer::<8>::new();
        assert!(ring.is_empty());
        assert!(!ring.is_full());
        assert_eq!(ring.dequeue(), None);
        assert_eq!(ring.free_slots(), 7);
    }

    #[test]
    fn test_accepts_capacity_minus_one() {
        let ring = RingBuffer::<8>::new();
        for i in 0..7 {
            assert!(ring.enqueue(i));
        }
        assert!(ring.is_full());
        assert!(!ring.enqueue(99));
        assert_eq!(ring.len(), 7);

        // the rejected byte was not stored
        let drained: Vec<u8> = core::iter::from_fn(|| ring.dequeue()).collect();
        assert_eq!(drained, [0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_enqueue_then_dequeue_same_byte() {
        let ring = RingBuffer::<4>::new();
        assert!(ring.enqueue(0x5a));
        assert_eq!(ring.dequeue(), Some(0x5a));
        assert!(ring.is_empty());
    }

    #[test]
    fn test_wraps_around() {
        let ring = RingBuffer::<4>::new();
        for round in 0..10u8 {
            assert!(ring.enqueue(round));
            assert!(ring.enqueue(round.wrapping_add(100)));
            assert_eq!(ring.dequeue(), Some(round));
            assert_eq!(ring.dequeue(), Some(round.wrapping_add(100)));
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_min_free_tracks_low_water_mark() {
        let ring = RingBuffer::<8>::new();
        assert_eq!(ring.min_free(), 7);

        for i in 0..5 {
            assert!(ring.enqueue(i));
        }
        assert_eq!(ring.min_free(), 2);

        // draining does not raise the mark
        while ring.dequeue().is_some() {}
        assert_eq!(ring.min_free(), 2);

        ring.reset_statistics();
        assert_eq!(ring.min_free(), 7);
    }

    #[test]
    fn test_reset_empties() {
        let ring = RingBuffer::<4>::new();
        assert!(ring.enqueue(1));
        assert!(ring.enqueue(2));
        ring.reset();
        assert!(ring.is_empty());
        assert_eq!(ring.min_free(), 3);
    }

    proptest! {
        #[test]
        fn prop_fifo_order(ops in proptest::collection::vec(proptest::option::of(any::<u8>()), 0..200)) {
            // Some(byte) enqueues, None dequeues
            let ring = RingBuffer::<16>::new();
            let mut model = VecDeque::new();

            for op in ops {
                match op {
                    Some(byte) => {
                        let accepted = ring.enqueue(byte);
                        prop_assert_eq!(accepted, model.len() < 15);
                        if accepted {
                            model.push_back(byte);
                        }
                    }
                    None => prop_assert_eq!(ring.dequeue(), model.pop_front()),
                }
                prop_assert_eq!(ring.len(), model.len());
            }
        }
    }
}
