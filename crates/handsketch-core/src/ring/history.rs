use std::collections::VecDeque;
use std::collections::vec_deque::Iter;
use std::num::NonZeroUsize;

/// Ordered sequence with a fixed capacity; pushing onto a full buffer evicts
/// the oldest entry.
#[derive(Clone, Debug)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    capacity: NonZeroUsize,
}

impl<T> BoundedHistory<T> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        BoundedHistory {
            items: VecDeque::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// Append `value`, returning the evicted entry if the buffer was full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity.get() {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity.get()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a BoundedHistory<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn push_evicts_oldest_when_full() {
        let mut history = BoundedHistory::new(cap(3));
        assert_eq!(history.push(1), None);
        assert_eq!(history.push(2), None);
        assert_eq!(history.push(3), None);
        assert!(history.is_full());

        assert_eq!(history.push(4), Some(1));
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(history.latest(), Some(&4));
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let mut history = BoundedHistory::new(cap(5));
        for i in 0..50 {
            history.push(i);
            assert!(history.len() <= history.capacity());
        }
    }
}
