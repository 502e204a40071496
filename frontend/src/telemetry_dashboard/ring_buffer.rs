// frontend/src/telemetry_dashboard/ring_buffer.rs

use std::collections::VecDeque;

/// Fixed-capacity FIFO. Pushing into a full buffer evicts the oldest item.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer<T> {
    max: usize,
    buf: VecDeque<T>,
}

impl<T> RingBuffer<T> {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            buf: VecDeque::with_capacity(max),
        }
    }

    /// Starts full of `fill`, so a chart draws a flat line before data arrives.
    pub fn seeded(max: usize, fill: T) -> Self
    where
        T: Clone,
    {
        Self {
            max,
            buf: std::iter::repeat_n(fill, max).collect(),
        }
    }

    /// Returns the evicted item, if any.
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.max == 0 {
            return Some(item);
        }
        let evicted = if self.buf.len() == self.max {
            self.buf.pop_front()
        } else {
            None
        };
        self.buf.push_back(item);
        evicted
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.buf.iter()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl<T: Clone> RingBuffer<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.buf.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_when_full() {
        let mut rb = RingBuffer::new(3);
        assert_eq!(rb.push(1), None);
        rb.push(2);
        rb.push(3);
        assert_eq!(rb.push(4), Some(1));
        assert_eq!(rb.to_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn seeded_buffer_starts_full() {
        let mut rb = RingBuffer::seeded(4, 0.0);
        assert_eq!(rb.len(), 4);
        assert_eq!(rb.push(1.0), Some(0.0));
        assert_eq!(rb.to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn zero_capacity_holds_nothing() {
        let mut rb = RingBuffer::new(0);
        assert_eq!(rb.push(7), Some(7));
        assert!(rb.is_empty());
    }
}
