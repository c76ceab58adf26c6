//! Binary heaps and heap-based selection
//!
//! - [`heap::BinaryHeap`]: array-backed max-heap or min-heap
//! - [`sort::heap_sort`]: in-place heap sort
//! - [`topk::top_k`] and [`topk::TopKStream`]: bounded Top-K over finite
//!   collections and unbounded streams
//! - [`merge::merge`]: lazy k-way merge of sorted sequences
//! - [`sharded::sharded_top_k`]: most frequent keys of a log, counted per
//!   hash partition
//!
//! ## Usage
//!
//! ```
//! use heap_select::base::Direction;
//! use heap_select::topk::{top_k, TopKOptions};
//!
//! let top = top_k([3, 1, 4, 1, 5, 9, 2, 6], 3, Direction::Max, &TopKOptions::default()).unwrap();
//! assert_eq!(top, vec![9, 6, 5]);
//! ```

pub mod base;
pub mod heap;
pub mod merge;
pub mod sharded;
pub mod sort;
pub mod topk;
pub mod utils {
    pub mod buffer;
}

pub use base::{Direction, HeapError, KeyCount, Result};
pub use heap::BinaryHeap;
pub use merge::{merge, KWayMerge};
pub use sharded::{sharded_top_k, ShardedTopK};
pub use sort::heap_sort;
pub use topk::{top_k, TopKStream};
