use std::{collections::VecDeque, num::NonZeroUsize};

/// Fixed-capacity FIFO that drops the oldest entry once full.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    length: NonZeroUsize,
    inner: VecDeque<T>,
}

impl<T> RingBuffer<T> {
    pub fn new(length: NonZeroUsize) -> Self {
        Self {
            length,
            inner: VecDeque::with_capacity(length.get()),
        }
    }

    /// Push a new entry, handing back the one that fell out so callers can keep running
    /// aggregates in sync.
    pub fn push_back(&mut self, item: T) -> Option<T> {
        let evicted = if self.inner.len() == self.length.get() {
            self.inner.pop_front()
        } else {
            None
        };

        self.inner.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.inner.iter()
    }
}
