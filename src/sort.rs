//! In-place heap sort

use crate::base::Direction;
use crate::heap::{heapify, sift_down};

/// Sorts a slice in place in the extraction order of a `direction` heap:
/// non-increasing for `Max`, non-decreasing for `Min`
///
/// Runs in O(n log n) with O(1) extra space. The slice is first turned into a
/// heap of the opposite direction; its root is then repeatedly swapped into
/// the last slot of the shrinking heap, so the tail fills up from the back.
/// The sort is not stable.
pub fn heap_sort<T: Ord>(items: &mut [T], direction: Direction) {
    let order = direction.opposite();
    heapify(items, order);

    let mut end = items.len();
    while end > 1 {
        end -= 1;
        items.swap(0, end);
        sift_down(&mut items[..end], 0, order);
    }
}

/// Collects and sorts items, see [`heap_sort`]
pub fn sorted<T: Ord, I: IntoIterator<Item = T>>(items: I, direction: Direction) -> Vec<T> {
    let mut v: Vec<T> = items.into_iter().collect();
    heap_sort(&mut v, direction);
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_sort() {
        let mut v = [3, 1, 4, 1, 5, 9, 2, 6];
        heap_sort(&mut v, Direction::Max);
        assert_eq!(v, [9, 6, 5, 4, 3, 2, 1, 1]);
    }

    #[test]
    fn test_min_sort() {
        assert_eq!(
            sorted([3, 1, 4, 1, 5, 9, 2, 6], Direction::Min),
            vec![1, 1, 2, 3, 4, 5, 6, 9]
        );
    }

    #[test]
    fn test_degenerate_inputs() {
        let mut empty: [i32; 0] = [];
        heap_sort(&mut empty, Direction::Max);

        let mut single = [42];
        heap_sort(&mut single, Direction::Min);
        assert_eq!(single, [42]);

        let mut same = vec![7; 9];
        heap_sort(&mut same, Direction::Max);
        assert_eq!(same, vec![7; 9]);
    }

    #[test]
    fn test_strings() {
        let words = sorted(vec!["pear", "apple", "fig", "kiwi"], Direction::Min);
        assert_eq!(words, vec!["apple", "fig", "kiwi", "pear"]);
    }
}
