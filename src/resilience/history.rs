//! Fixed-capacity record history shared by the orchestrator and the health prober.

use std::collections::VecDeque;

/// Ring buffer that evicts the oldest entry once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn push(&mut self, entry: T) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }
}

impl<T: Clone> BoundedHistory<T> {
    /// The last `n` entries, most recent last.
    pub fn last(&self, n: usize) -> Vec<T> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut history = BoundedHistory::new(3);
        for i in 0..10 {
            history.push(i);
            assert!(history.len() <= 3);
        }
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![7, 8, 9]);
    }

    #[test]
    fn test_last_n() {
        let mut history = BoundedHistory::new(100);
        for i in 0..5 {
            history.push(i);
        }
        assert_eq!(history.last(2), vec![3, 4]);
        assert_eq!(history.last(50), vec![0, 1, 2, 3, 4]);
        assert!(history.last(0).is_empty());
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = BoundedHistory::new(0);
        history.push("a");
        history.push("b");
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.last(5), vec!["b"]);
    }
}
