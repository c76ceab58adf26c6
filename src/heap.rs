//! Array-backed binary heap with a direction chosen at construction
//!
//! The tree is stored in a `Vec`: the root is at index 0, the children of `i`
//! are at `2i + 1` and `2i + 2`, and its parent at `(i - 1) / 2`. Appending at
//! the end and removing from the end keeps the tree complete.
//!
//! Equal elements may be reordered by sift operations: there is no stability
//! guarantee, and the relative order of ties is unspecified.

use log::debug;

use crate::base::{Direction, HeapError, Len, Result};

#[inline]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}

#[inline]
fn left_child(i: usize) -> usize {
    2 * i + 1
}

/// Moves the element at `i` towards the root until its parent precedes it
pub(crate) fn sift_up<T: Ord>(data: &mut [T], mut i: usize, direction: Direction) {
    while i > 0 {
        let p = parent(i);
        if direction.precedes(&data[i], &data[p]) {
            data.swap(i, p);
            i = p;
        } else {
            break;
        }
    }
}

/// Moves the element at `i` towards the leaves, swapping it with its most
/// extreme child while that child precedes it
pub(crate) fn sift_down<T: Ord>(data: &mut [T], mut i: usize, direction: Direction) {
    let len = data.len();
    loop {
        let left = left_child(i);
        if left >= len {
            break;
        }

        let right = left + 1;
        let mut child = left;
        if right < len && direction.precedes(&data[right], &data[left]) {
            child = right;
        }

        if direction.precedes(&data[child], &data[i]) {
            data.swap(i, child);
            i = child;
        } else {
            break;
        }
    }
}

/// Rearranges a slice into a heap, bottom-up
///
/// The last `n / 2` positions are leaves; internal nodes are sifted down from
/// the last one to the root, which costs O(n) overall.
pub(crate) fn heapify<T: Ord>(data: &mut [T], direction: Direction) {
    for i in (0..data.len() / 2).rev() {
        sift_down(data, i, direction);
    }
}

/// Checks the heap invariant on every non-root position
pub(crate) fn is_heap<T: Ord>(data: &[T], direction: Direction) -> bool {
    (1..data.len()).all(|i| !direction.precedes(&data[i], &data[parent(i)]))
}

/// Binary heap over a total order, either a max-heap or a min-heap
///
/// The heap is not synchronized: callers that share one instance between
/// threads must serialize mutations themselves.
#[derive(Clone, Debug)]
pub struct BinaryHeap<T> {
    data: Vec<T>,
    direction: Direction,
}

impl<T: Ord> BinaryHeap<T> {
    /// Creates an empty heap
    pub fn new(direction: Direction) -> Self {
        Self {
            data: Vec::new(),
            direction,
        }
    }

    /// Creates an empty heap able to hold `capacity` elements without reallocating
    pub fn with_capacity(direction: Direction, capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            direction,
        }
    }

    /// Builds a heap from a collection in O(n)
    pub fn build<I: IntoIterator<Item = T>>(items: I, direction: Direction) -> Self {
        Self::from_vec(items.into_iter().collect(), direction)
    }

    /// Builds a heap reusing the vector as backing storage
    pub fn from_vec(mut data: Vec<T>, direction: Direction) -> Self {
        heapify(&mut data, direction);
        debug_assert!(is_heap(&data, direction));
        Self { data, direction }
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Adds an element in O(log n)
    pub fn insert(&mut self, item: T) {
        self.data.push(item);
        let last = self.data.len() - 1;
        sift_up(&mut self.data, last, self.direction);
    }

    /// Returns the root (largest element for a max-heap, smallest for a min-heap)
    pub fn peek(&self) -> Result<&T> {
        self.data.first().ok_or(HeapError::EmptyHeap)
    }

    /// Removes and returns the root in O(log n)
    pub fn extract_top(&mut self) -> Result<T> {
        if self.data.is_empty() {
            return Err(HeapError::EmptyHeap);
        }

        let top = self.data.swap_remove(0);
        if !self.data.is_empty() {
            sift_down(&mut self.data, 0, self.direction);
        }
        Ok(top)
    }

    /// Replaces the root by `item` and restores the heap with a single sift-down
    ///
    /// Returns the evicted root. On an empty heap there is nothing to evict:
    /// the item is inserted and `None` is returned.
    pub fn replace_top(&mut self, item: T) -> Option<T> {
        match self.data.first_mut() {
            Some(root) => {
                let previous = std::mem::replace(root, item);
                sift_down(&mut self.data, 0, self.direction);
                Some(previous)
            }
            None => {
                debug!("replace_top on an empty heap, inserting instead");
                self.data.push(item);
                None
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Heap elements in storage order (not sorted)
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consumes the heap and returns the backing storage (not sorted)
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Consumes the heap and returns its elements in extraction order
    /// (decreasing for a max-heap, increasing for a min-heap)
    ///
    /// Sorts the backing storage in place: each extracted root is swapped
    /// into the slot freed at the end of the heap, which yields the reverse of
    /// the extraction order, so the vector is reversed at the end.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut end = self.data.len();
        while end > 1 {
            end -= 1;
            self.data.swap(0, end);
            sift_down(&mut self.data[..end], 0, self.direction);
        }
        self.data.reverse();
        self.data
    }

    /// Checks the heap invariant for all positions
    pub fn is_heap(&self) -> bool {
        is_heap(&self.data, self.direction)
    }
}

impl<T: Ord> Len for BinaryHeap<T> {
    fn len(&self) -> usize {
        self.data.len()
    }
}

impl<T: Ord> Extend<T> for BinaryHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}
