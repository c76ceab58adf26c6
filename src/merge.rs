//! K-way merge of sorted sequences
//!
//! The merge heap holds one `(head, source)` entry per source that still has
//! elements. Each step pops the most extreme head, emits it and pulls exactly
//! one replacement from the same source, so memory stays O(M) for M sources
//! and sources are never read ahead.

use std::cmp::Ordering;

use log::debug;

use crate::base::Direction;
use crate::heap::BinaryHeap;

/// Head of a source, ordered by value then source index
struct HeadEntry<T> {
    value: T,
    source: usize,
}

impl<T: Ord> PartialEq for HeadEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: Ord> Eq for HeadEntry<T> {}

impl<T: Ord> PartialOrd for HeadEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for HeadEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.source.cmp(&other.source))
    }
}

/// Lazy merge of sorted sources
///
/// With `Direction::Min` the sources must be non-decreasing and the output is
/// non-decreasing; with `Direction::Max` both are non-increasing. Unsorted
/// inputs produce an output that is only as sorted as its inputs.
pub struct KWayMerge<I: Iterator> {
    sources: Vec<I>,
    heap: BinaryHeap<HeadEntry<I::Item>>,
    direction: Direction,
}

impl<I> KWayMerge<I>
where
    I: Iterator,
    I::Item: Ord,
{
    pub fn new<S>(sources: S, direction: Direction) -> Self
    where
        S: IntoIterator,
        S::Item: IntoIterator<IntoIter = I, Item = I::Item>,
    {
        let mut sources: Vec<I> = sources.into_iter().map(|s| s.into_iter()).collect();

        let heads: Vec<HeadEntry<I::Item>> = sources
            .iter_mut()
            .enumerate()
            .filter_map(|(source, it)| it.next().map(|value| HeadEntry { value, source }))
            .collect();

        debug!(
            "Merging {} sources ({} non empty, {})",
            sources.len(),
            heads.len(),
            direction
        );

        Self {
            heap: BinaryHeap::from_vec(heads, direction),
            sources,
            direction,
        }
    }

    /// Number of sources that still have elements
    pub fn active_sources(&self) -> usize {
        self.heap.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl<I> Iterator for KWayMerge<I>
where
    I: Iterator,
    I::Item: Ord,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.heap.peek().ok()?.source;

        match self.sources[source].next() {
            Some(value) => {
                let head = self.heap.peek().ok()?;
                if self.direction.precedes(&value, &head.value) {
                    debug!("Source {} is not sorted", source);
                }
                self.heap
                    .replace_top(HeadEntry { value, source })
                    .map(|entry| entry.value)
            }
            None => {
                debug!("Source {} is exhausted", source);
                self.heap.extract_top().ok().map(|entry| entry.value)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let mut lower = self.heap.len();
        let mut upper = Some(self.heap.len());
        for entry in self.heap.as_slice() {
            let (lo, hi) = self.sources[entry.source].size_hint();
            lower = lower.saturating_add(lo);
            upper = match (upper, hi) {
                (Some(u), Some(h)) => u.checked_add(h),
                _ => None,
            };
        }
        (lower, upper)
    }
}

/// Merges sorted sources into one sorted sequence, see [`KWayMerge`]
pub fn merge<S>(
    sources: S,
    direction: Direction,
) -> KWayMerge<<S::Item as IntoIterator>::IntoIter>
where
    S: IntoIterator,
    S::Item: IntoIterator,
    <S::Item as IntoIterator>::Item: Ord,
{
    KWayMerge::new(sources, direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sources() {
        let merged: Vec<_> =
            merge(vec![vec![1, 4, 8], vec![2, 3, 9]], Direction::Min).collect();
        assert_eq!(merged, vec![1, 2, 3, 4, 8, 9]);
    }

    #[test]
    fn test_descending() {
        let merged: Vec<_> =
            merge(vec![vec![8, 4, 1], vec![9, 3, 2]], Direction::Max).collect();
        assert_eq!(merged, vec![9, 8, 4, 3, 2, 1]);
    }

    #[test]
    fn test_no_source() {
        let sources: Vec<Vec<i32>> = vec![];
        assert_eq!(merge(sources, Direction::Min).count(), 0);
    }

    #[test]
    fn test_empty_sources() {
        let mut merged = merge(vec![vec![], vec![5], vec![], vec![1, 5]], Direction::Min);
        assert_eq!(merged.active_sources(), 2);
        assert_eq!(merged.size_hint(), (3, Some(3)));
        assert_eq!(merged.next(), Some(1));
        assert_eq!(merged.by_ref().collect::<Vec<_>>(), vec![5, 5]);
        assert_eq!(merged.active_sources(), 0);
    }

    #[test]
    fn test_lazy_pull() {
        // Each step consumes at most one element from one source
        let counter = std::cell::Cell::new(0);
        let pulled = &counter;
        let source = move |offset: i32| {
            (0..5).map(move |x| {
                pulled.set(pulled.get() + 1);
                x * 2 + offset
            })
        };

        let mut merged = merge(vec![source(0), source(1)], Direction::Min);
        assert_eq!(pulled.get(), 2);
        assert_eq!(merged.next(), Some(0));
        assert_eq!(pulled.get(), 3);
        assert_eq!(merged.next(), Some(1));
        assert_eq!(pulled.get(), 4);
    }
}
