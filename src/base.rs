use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of occurrences of a key
pub type Count = u64;

/// Errors raised by heap operations and the algorithms built on them
#[derive(Error, Debug)]
pub enum HeapError {
    #[error("the heap is empty")]
    EmptyHeap,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("shard storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("shard record (de)serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, HeapError>;

/// Marks object that have a length
pub trait Len {
    fn len(&self) -> usize;
}

/// Heap order, fixed when the heap is created
///
/// With `Max`, the root is the largest element (every parent is greater or
/// equal to its children); with `Min` it is the smallest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Max,
    Min,
}

impl Direction {
    /// The other direction (used by Top-K windows, whose root must be the
    /// weakest retained element)
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Max => Direction::Min,
            Direction::Min => Direction::Max,
        }
    }

    /// True if `a` must be closer to the root than `b`, i.e. `a` is strictly
    /// more extreme than `b` under this direction
    #[inline]
    pub fn precedes<T: Ord + ?Sized>(self, a: &T, b: &T) -> bool {
        match self {
            Direction::Max => a > b,
            Direction::Min => a < b,
        }
    }

    /// Ordering such that sorting with it lists elements in extraction order
    #[inline]
    pub fn extraction_cmp<T: Ord + ?Sized>(self, a: &T, b: &T) -> Ordering {
        match self {
            Direction::Max => b.cmp(a),
            Direction::Min => a.cmp(b),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Max => write!(f, "max"),
            Direction::Min => write!(f, "min"),
        }
    }
}

impl FromStr for Direction {
    type Err = HeapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "max" | "desc" | "descending" => Ok(Direction::Max),
            "min" | "asc" | "ascending" => Ok(Direction::Min),
            _ => Err(HeapError::InvalidArgument(format!(
                "unknown heap direction '{}' (expected max or min)",
                s
            ))),
        }
    }
}

/// Key and its number of occurrences
///
/// Ordered by count first, then by key, so that a selection over a frequency
/// table does not depend on the table iteration order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyCount<K> {
    pub key: K,
    pub count: Count,
}

impl<K> KeyCount<K> {
    pub fn new(key: K, count: Count) -> Self {
        Self { key, count }
    }
}

impl<K: fmt::Display> fmt::Display for KeyCount<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.key, self.count)
    }
}

impl<K: Ord> PartialOrd for KeyCount<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for KeyCount<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| self.key.cmp(&other.key))
    }
}

impl<K> From<(K, Count)> for KeyCount<K> {
    fn from((key, count): (K, Count)) -> Self {
        Self { key, count }
    }
}

/// Checks that k is a valid window size
pub(crate) fn check_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(HeapError::InvalidArgument(
            "k should be strictly positive".to_string(),
        ));
    }
    Ok(())
}

/// Checks that a sharded computation has at least one shard
pub(crate) fn check_shard_count(shard_count: usize) -> Result<()> {
    if shard_count == 0 {
        return Err(HeapError::InvalidArgument(
            "the number of shards should be strictly positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direction() {
        assert_eq!("max".parse::<Direction>().unwrap(), Direction::Max);
        assert_eq!("Asc".parse::<Direction>().unwrap(), Direction::Min);
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(HeapError::InvalidArgument(_))
        ));
        assert_eq!(Direction::Max.opposite(), Direction::Min);
    }

    #[test]
    fn test_key_count_order() {
        let a = KeyCount::new("a", 3);
        let b = KeyCount::new("b", 3);
        let c = KeyCount::new("c", 1);
        assert!(a < b);
        assert!(c < a);
        assert!(Direction::Max.precedes(&b, &a));
        assert_eq!(format!("{}", a), "(a,3)");
    }
}
