//! Online Top-K over an unbounded stream

use crate::base::{Direction, Result};

use super::{TopKOptions, TopKWindow};

/// Maintains the top-k of a stream with O(k) memory
///
/// Each call to [`TopKStream::observe`] is self-contained, so a stream can be
/// abandoned between two calls without leaving the window inconsistent.
pub struct TopKStream<T> {
    window: TopKWindow<T>,
    options: TopKOptions,
    seen: u64,
}

impl<T: Ord> TopKStream<T> {
    pub fn new(k: usize, direction: Direction, options: TopKOptions) -> Result<Self> {
        Ok(Self {
            window: TopKWindow::new(k, direction)?,
            options,
            seen: 0,
        })
    }

    /// Updates the window in O(log k); returns true if the item was admitted
    pub fn observe(&mut self, item: T) -> bool {
        self.seen += 1;
        self.window.observe(item)
    }

    /// Observes all the items, returning how many were admitted
    pub fn observe_all<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize {
        let mut admitted = 0;
        for item in items {
            if self.observe(item) {
                admitted += 1;
            }
        }
        admitted
    }

    /// Number of items observed so far
    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn k(&self) -> usize {
        self.window.capacity()
    }

    /// The bound a new item has to beat to be admitted (None while fewer than
    /// k items have been observed)
    pub fn threshold(&self) -> Option<&T> {
        self.window.threshold()
    }

    /// Consumes the stream and returns the final top-k, sorted or not
    /// according to the stream options
    pub fn into_vec(self) -> Vec<T> {
        self.window.finish(&self.options)
    }

    /// Consumes the stream and returns the final top-k, most extreme first,
    /// whatever the options
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.window.into_sorted_vec()
    }
}

impl<T: Ord + Clone> TopKStream<T> {
    /// Current top-k, without draining the window
    pub fn snapshot(&self) -> Vec<T> {
        self.window.clone().finish(&self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_does_not_drain() {
        let mut stream = TopKStream::new(2, Direction::Max, TopKOptions::default()).unwrap();
        stream.observe_all([4, 1, 7]);
        assert_eq!(stream.snapshot(), vec![7, 4]);
        assert_eq!(stream.len(), 2);

        assert!(stream.observe(9));
        assert!(!stream.observe(3));
        assert_eq!(stream.snapshot(), vec![9, 7]);
        assert_eq!(stream.seen(), 5);
        assert_eq!(stream.into_vec(), vec![9, 7]);
    }

    #[test]
    fn test_smallest() {
        let mut stream = TopKStream::new(3, Direction::Min, TopKOptions::default()).unwrap();
        assert_eq!(stream.observe_all([10, 3, 8, 1, 6, 2]), 6);
        assert_eq!(stream.threshold(), Some(&3));
        assert_eq!(stream.snapshot(), vec![1, 2, 3]);
    }

    #[test]
    fn test_sorted_despite_options() {
        let options = TopKOptions { sorted: false };
        let mut stream = TopKStream::new(3, Direction::Max, options).unwrap();
        stream.observe_all([5, 12, 3, 9, 1, 7]);

        let mut unsorted = stream.snapshot();
        unsorted.sort();
        assert_eq!(unsorted, vec![7, 9, 12]);
        assert_eq!(stream.into_sorted_vec(), vec![12, 9, 7]);
    }
}
