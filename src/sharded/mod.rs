//! Top-K over key logs too large for a single frequency table
//!
//! ## Phases
//!
//! 1. **route**: every key is sent to shard `router.shard(key, n)` and
//!    appended to the shard store (in memory, or one spill file per shard)
//! 2. **local**: each shard is counted independently and reduced to its own
//!    top-k `(key, count)` pairs; shards share nothing and are processed in
//!    parallel
//! 3. **reduce**: once all the shards are done, the (at most) `n × k`
//!    candidates are reduced to the global top-k
//!
//! Since routing is deterministic, all the occurrences of a key end up in the
//! same shard: the local count of a key is its global count, and a key that
//! belongs to the global top-k necessarily belongs to its shard's top-k.

pub mod router;
pub mod store;

use std::collections::HashMap;
use std::hash::Hash;

use derivative::Derivative;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use crate::base::{check_k, check_shard_count, Count, Direction, KeyCount, Result};
use crate::topk::{top_k, top_k_frequencies, TopKOptions};

pub use router::{HashRouter, ShardRouter};
pub use store::{MemoryShardStore, ShardKeys, ShardStore, SpillShardStore};

const DEFAULT_PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} shards ({eta})";

fn pb_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(DEFAULT_PROGRESS_TEMPLATE)
        .progress_chars("=> ")
}

/// Builds the frequency table of a shard
///
/// Fails with the first error raised while reading the shard keys.
pub trait FrequencyCounter<K>: Sync {
    type Table: IntoIterator<Item = (K, Count)>;

    fn count(&self, keys: ShardKeys<'_, K>) -> Result<Self::Table>;
}

/// Counts keys with a hash map
#[derive(Clone, Copy, Debug, Default)]
pub struct HashMapCounter;

impl<K: Hash + Eq> FrequencyCounter<K> for HashMapCounter {
    type Table = HashMap<K, Count>;

    fn count(&self, keys: ShardKeys<'_, K>) -> Result<Self::Table> {
        let mut table = HashMap::new();
        for key in keys {
            *table.entry(key?).or_insert(0) += 1;
        }
        Ok(table)
    }
}

#[derive(Derivative, Clone, Debug)]
#[derivative(Default)]
pub struct ShardOptions {
    /// Process the shards in parallel
    #[derivative(Default(value = "true"))]
    pub parallel: bool,

    /// Display a progress bar while shards are processed
    #[derivative(Default(value = "false"))]
    pub progress: bool,

    /// Return the global top-k sorted by decreasing count
    #[derivative(Default(value = "true"))]
    pub sorted: bool,
}

/// Sharded Top-K with an injected router and frequency counter
pub struct ShardedTopK<R = HashRouter, C = HashMapCounter> {
    router: R,
    counter: C,
    options: ShardOptions,
}

impl ShardedTopK {
    /// Uses hash routing and hash map counting
    pub fn new(options: ShardOptions) -> Self {
        Self::with_parts(HashRouter::new(), HashMapCounter, options)
    }
}

impl<R, C> ShardedTopK<R, C> {
    pub fn with_parts(router: R, counter: C, options: ShardOptions) -> Self {
        Self {
            router,
            counter,
            options,
        }
    }

    pub fn options(&self) -> &ShardOptions {
        &self.options
    }

    /// Phase 1: sends every key of the stream to its shard, and seals the
    /// store. Returns the number of routed keys.
    pub fn route<K, I, S>(&self, stream: I, store: &mut S) -> Result<u64>
    where
        R: ShardRouter<K>,
        S: ShardStore<K>,
        I: IntoIterator<Item = K>,
    {
        let shard_count = store.shard_count();
        check_shard_count(shard_count)?;
        let mut routed = 0u64;
        for key in stream {
            let shard = self.router.shard(&key, shard_count);
            store.append(shard, key)?;
            routed += 1;
        }
        store.seal()?;

        info!("Routed {} keys to {} shards", routed, shard_count);
        Ok(routed)
    }

    /// Top-k of a single shard
    fn shard_top_k<K, S>(
        &self,
        store: &S,
        shard: usize,
        k: usize,
    ) -> Result<Vec<KeyCount<K>>>
    where
        K: Ord,
        C: FrequencyCounter<K>,
        S: ShardStore<K>,
    {
        let table = self.counter.count(store.keys(shard)?)?;
        let candidates = top_k_frequencies(table, k, &TopKOptions { sorted: false })?;
        debug!("Shard {}: {} candidates", shard, candidates.len());
        Ok(candidates)
    }

    /// Phase 2: computes the top-k of each shard
    pub fn local_top_k<K, S>(&self, store: &S, k: usize) -> Result<Vec<Vec<KeyCount<K>>>>
    where
        K: Ord + Send,
        R: Sync,
        C: FrequencyCounter<K>,
        S: ShardStore<K>,
    {
        check_k(k)?;
        let shard_count = store.shard_count();
        check_shard_count(shard_count)?;

        let progress = if self.options.progress {
            let progress = ProgressBar::new(shard_count as u64);
            progress.set_style(pb_style());
            progress
        } else {
            ProgressBar::hidden()
        };

        let candidates = if self.options.parallel {
            (0..shard_count)
                .into_par_iter()
                .map(|shard| {
                    let r = self.shard_top_k(store, shard, k);
                    progress.inc(1);
                    r
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            let mut candidates = Vec::with_capacity(shard_count);
            for shard in 0..shard_count {
                candidates.push(self.shard_top_k(store, shard, k)?);
                progress.inc(1);
            }
            candidates
        };
        progress.finish();

        Ok(candidates)
    }

    /// Phase 3: reduces the shard candidates to the global top-k
    pub fn reduce<K: Ord>(
        &self,
        candidates: Vec<Vec<KeyCount<K>>>,
        k: usize,
    ) -> Result<Vec<KeyCount<K>>> {
        let total: usize = candidates.iter().map(|c| c.len()).sum();
        info!(
            "Reducing {} candidates from {} shards",
            total,
            candidates.len()
        );

        top_k(
            candidates.into_iter().flatten(),
            k,
            Direction::Max,
            &TopKOptions {
                sorted: self.options.sorted,
            },
        )
    }

    /// Runs the three phases
    pub fn run<K, I, S>(
        &self,
        stream: I,
        store: &mut S,
        k: usize,
    ) -> Result<Vec<KeyCount<K>>>
    where
        K: Ord + Send,
        R: ShardRouter<K>,
        C: FrequencyCounter<K>,
        S: ShardStore<K>,
        I: IntoIterator<Item = K>,
    {
        check_k(k)?;
        check_shard_count(store.shard_count())?;
        self.route(stream, store)?;
        let candidates = self.local_top_k(store, k)?;
        self.reduce(candidates, k)
    }
}

/// Returns the `k` most frequent keys of a stream, counting each of the
/// `shard_count` hash partitions separately in memory
pub fn sharded_top_k<K, I>(
    stream: I,
    shard_count: usize,
    k: usize,
) -> Result<Vec<KeyCount<K>>>
where
    K: Hash + Eq + Ord + Clone + Send + Sync,
    I: IntoIterator<Item = K>,
{
    check_k(k)?;
    let mut store = MemoryShardStore::new(shard_count)?;
    ShardedTopK::new(ShardOptions::default()).run(stream, &mut store, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::HeapError;

    fn keywords() -> Vec<&'static str> {
        "a b c a b a d e a b c f a g b".split(' ').collect()
    }

    #[test]
    fn test_sharded() {
        let top = sharded_top_k(keywords(), 3, 2).unwrap();
        assert_eq!(top, vec![KeyCount::new("a", 5), KeyCount::new("b", 4)]);
    }

    #[test]
    fn test_sequential() {
        let sharded = ShardedTopK::new(ShardOptions {
            parallel: false,
            ..Default::default()
        });
        let mut store = MemoryShardStore::new(4).unwrap();
        let top = sharded.run(keywords(), &mut store, 3).unwrap();
        assert_eq!(
            top,
            vec![
                KeyCount::new("a", 5),
                KeyCount::new("b", 4),
                KeyCount::new("c", 2)
            ]
        );
        assert_eq!((0..4).map(|s| store.shard_len(s)).sum::<usize>(), 15);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            sharded_top_k(keywords(), 0, 2),
            Err(HeapError::InvalidArgument(_))
        ));
        assert!(matches!(
            sharded_top_k(keywords(), 2, 0),
            Err(HeapError::InvalidArgument(_))
        ));
    }
}
