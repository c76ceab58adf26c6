//! Bounded Top-K selection
//!
//! A window of capacity k keeps the best k elements seen so far in a heap of
//! the *opposite* direction: when looking for the k largest elements, the
//! window is a min-heap whose root is the weakest retained element, so that
//! admitting a new element costs a single `replace_top`.
//!
//! Elements equal to the window root are not admitted once the window is
//! full; which of several tied elements ends up at the boundary is unspecified.

pub mod stream;

use derivative::Derivative;
use log::debug;

use crate::base::{check_k, Count, Direction, KeyCount, Result};
use crate::heap::BinaryHeap;

pub use stream::TopKStream;

#[derive(Derivative, Clone, Debug)]
#[derivative(Default)]
pub struct TopKOptions {
    /// Sort the selected elements (most extreme first) with a final heap sort
    /// pass; when false, the elements are returned in window storage order
    #[derivative(Default(value = "true"))]
    pub sorted: bool,
}

/// Bounded window holding the k most extreme elements observed so far
#[derive(Clone, Debug)]
pub struct TopKWindow<T> {
    heap: BinaryHeap<T>,
    capacity: usize,
    direction: Direction,
}

impl<T: Ord> TopKWindow<T> {
    /// Creates a window keeping the `k` largest (`Max`) or smallest (`Min`)
    /// elements
    pub fn new(k: usize, direction: Direction) -> Result<Self> {
        check_k(k)?;
        Ok(Self {
            heap: BinaryHeap::with_capacity(direction.opposite(), k),
            capacity: k,
            direction,
        })
    }

    /// Offers a new candidate, and returns true if it was admitted
    ///
    /// While the window is not full every element is admitted. Afterwards an
    /// element is admitted only if it is strictly more extreme than the
    /// current threshold, which it then evicts.
    pub fn observe(&mut self, item: T) -> bool {
        if self.heap.len() < self.capacity {
            self.heap.insert(item);
            return true;
        }

        let admit = match self.heap.peek() {
            Ok(weakest) => self.direction.precedes(&item, weakest),
            Err(_) => true,
        };

        if admit {
            self.heap.replace_top(item);
        }
        admit
    }

    /// The weakest retained element once the window is full, i.e. the bound
    /// a new element has to beat
    pub fn threshold(&self) -> Option<&T> {
        if self.is_full() {
            self.heap.peek().ok()
        } else {
            None
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Maximum number of retained elements (k)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Retained elements in window storage order
    pub fn as_slice(&self) -> &[T] {
        self.heap.as_slice()
    }

    /// Retained elements in window storage order
    pub fn into_vec(self) -> Vec<T> {
        self.heap.into_vec()
    }

    /// Retained elements, most extreme first
    pub fn into_sorted_vec(self) -> Vec<T> {
        // The window heap has the opposite direction: its extraction order is
        // the reverse of the one we want
        let mut v = self.heap.into_sorted_vec();
        v.reverse();
        v
    }

    /// Consumes the window according to the options
    pub fn finish(self, options: &TopKOptions) -> Vec<T> {
        if options.sorted {
            self.into_sorted_vec()
        } else {
            self.into_vec()
        }
    }
}

/// Returns the `k` largest (`Max`) or smallest (`Min`) items in O(n log k)
///
/// If there are fewer than `k` items, all of them are returned.
pub fn top_k<T, I>(
    items: I,
    k: usize,
    direction: Direction,
    options: &TopKOptions,
) -> Result<Vec<T>>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut window = TopKWindow::new(k, direction)?;
    let mut seen = 0usize;
    let mut admitted = 0usize;
    for item in items {
        seen += 1;
        if window.observe(item) {
            admitted += 1;
        }
    }
    debug!(
        "Top-{} ({}): {} items seen, {} admitted",
        k, direction, seen, admitted
    );
    Ok(window.finish(options))
}

/// Returns the `k` most frequent entries of a frequency table
pub fn top_k_frequencies<K, I>(
    table: I,
    k: usize,
    options: &TopKOptions,
) -> Result<Vec<KeyCount<K>>>
where
    K: Ord,
    I: IntoIterator<Item = (K, Count)>,
{
    top_k(
        table.into_iter().map(KeyCount::from),
        k,
        Direction::Max,
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::HeapError;

    #[test]
    fn test_window_threshold() {
        let mut window = TopKWindow::new(3, Direction::Max).unwrap();
        assert!(window.observe(1));
        assert_eq!(window.threshold(), None);
        assert!(window.observe(2));
        assert!(window.observe(3));
        assert_eq!(window.threshold(), Some(&1));

        // Equal to the threshold: discarded
        assert!(!window.observe(1));
        assert!(!window.observe(0));
        assert!(window.observe(5));
        assert_eq!(window.threshold(), Some(&2));
        assert_eq!(window.len(), 3);
        assert_eq!(window.into_sorted_vec(), vec![5, 3, 2]);
    }

    const VALUES: [i32; 8] = [3, 1, 4, 1, 5, 9, 2, 6];

    #[test]
    fn test_top_k_max() {
        let top = top_k(VALUES, 3, Direction::Max, &TopKOptions::default()).unwrap();
        assert_eq!(top, vec![9, 6, 5]);
    }

    #[test]
    fn test_top_k_min() {
        let top = top_k(VALUES, 3, Direction::Min, &TopKOptions::default()).unwrap();
        assert_eq!(top, vec![1, 1, 2]);
    }

    #[test]
    fn test_top_k_unsorted() {
        let options = TopKOptions { sorted: false };
        let mut top = top_k(VALUES, 3, Direction::Max, &options).unwrap();
        top.sort();
        assert_eq!(top, vec![5, 6, 9]);
    }

    #[test]
    fn test_k_larger_than_input() {
        let top = top_k([2, 8, 5], 10, Direction::Max, &TopKOptions::default()).unwrap();
        assert_eq!(top, vec![8, 5, 2]);
    }

    #[test]
    fn test_zero_k() {
        let r = top_k([1, 2, 3], 0, Direction::Max, &TopKOptions::default());
        assert!(matches!(r, Err(HeapError::InvalidArgument(_))));
    }

    #[test]
    fn test_frequencies() {
        let table = vec![("a", 3), ("b", 10), ("c", 1), ("d", 7)];
        let top = top_k_frequencies(table, 2, &TopKOptions::default()).unwrap();
        assert_eq!(top, vec![KeyCount::new("b", 10), KeyCount::new("d", 7)]);
    }
}
