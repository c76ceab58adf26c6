//! Assignment of keys to shards

use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};

/// Assigns a key to a shard in `[0, shard_count)`
///
/// The assignment must be deterministic: all the occurrences of a key have to
/// land in the same shard for the sharded Top-K to be exact.
///
/// Callers pass a strictly positive `shard_count`; [`crate::sharded::ShardedTopK`]
/// rejects stores without shards before routing.
pub trait ShardRouter<K>: Send + Sync {
    fn shard(&self, key: &K, shard_count: usize) -> usize;
}

/// Routes with `hash(key) mod n`
#[derive(Clone, Debug, Default)]
pub struct HashRouter<S = BuildHasherDefault<DefaultHasher>> {
    hasher: S,
}

impl<S> HashRouter<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }
}

impl HashRouter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K: Hash, S: BuildHasher + Send + Sync> ShardRouter<K> for HashRouter<S> {
    fn shard(&self, key: &K, shard_count: usize) -> usize {
        let mut hasher = self.hasher.build_hasher();
        key.hash(&mut hasher);
        // `checked_rem` is None for 0 shards
        hasher
            .finish()
            .checked_rem(shard_count as u64)
            .unwrap_or(0) as usize
    }
}
