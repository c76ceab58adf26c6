//! Per-shard storage of routed keys
//!
//! Keys are appended shard by shard during routing, then read back one shard
//! at a time when counting. Reads of distinct shards may happen concurrently.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{de::DeserializeOwned, Serialize};

use crate::base::{check_shard_count, HeapError, Result};
use crate::utils::buffer::{open_buffer, Buffer};

/// An iterator over the keys of a shard
///
/// Reading a key may fail (e.g. a corrupted spill file); the iterator stops
/// after the first error.
pub type ShardKeys<'a, K> = Box<dyn Iterator<Item = Result<K>> + 'a>;

/// Storage for the keys routed to each shard
pub trait ShardStore<K>: Sync {
    /// Number of shards
    fn shard_count(&self) -> usize;

    /// Stores a key in the given shard
    fn append(&mut self, shard: usize, key: K) -> Result<()>;

    /// Called once all the keys have been appended
    fn seal(&mut self) -> Result<()> {
        Ok(())
    }

    /// Returns the keys of a shard (the store must have been sealed)
    fn keys(&self, shard: usize) -> Result<ShardKeys<'_, K>>;
}

fn check_shard(shard: usize, shard_count: usize) -> Result<()> {
    if shard >= shard_count {
        return Err(HeapError::InvalidArgument(format!(
            "shard {} is out of range (0..{})",
            shard, shard_count
        )));
    }
    Ok(())
}

/// Keeps the shards in memory
pub struct MemoryShardStore<K> {
    shards: Vec<Vec<K>>,
}

impl<K> MemoryShardStore<K> {
    pub fn new(shard_count: usize) -> Result<Self> {
        check_shard_count(shard_count)?;
        Ok(Self {
            shards: (0..shard_count).map(|_| Vec::new()).collect(),
        })
    }

    /// Number of keys stored in a shard
    pub fn shard_len(&self, shard: usize) -> usize {
        self.shards.get(shard).map_or(0, |s| s.len())
    }
}

impl<K: Clone + Sync> ShardStore<K> for MemoryShardStore<K> {
    fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn append(&mut self, shard: usize, key: K) -> Result<()> {
        check_shard(shard, self.shards.len())?;
        self.shards[shard].push(key);
        Ok(())
    }

    fn keys(&self, shard: usize) -> Result<ShardKeys<'_, K>> {
        check_shard(shard, self.shards.len())?;
        Ok(Box::new(self.shards[shard].iter().cloned().map(Ok)))
    }
}

/// Spills each shard to its own file as a sequence of CBOR records
///
/// Shard files are read back either fully in memory or through a memory map,
/// and decoded one record at a time while the shard is counted.
pub struct SpillShardStore {
    folder: PathBuf,
    writers: Vec<BufWriter<File>>,
    lengths: Vec<usize>,
    in_memory: bool,
}

impl SpillShardStore {
    /// Creates (or truncates) one spill file per shard in `folder`
    pub fn create(folder: &Path, shard_count: usize, in_memory: bool) -> Result<Self> {
        check_shard_count(shard_count)?;
        fs::create_dir_all(folder)?;

        let mut writers = Vec::with_capacity(shard_count);
        for shard in 0..shard_count {
            let file = File::options()
                .write(true)
                .create(true)
                .truncate(true)
                .open(Self::shard_path(folder, shard))?;
            writers.push(BufWriter::new(file));
        }

        info!(
            "Created {} spill files in {}",
            shard_count,
            folder.display()
        );

        Ok(Self {
            folder: folder.to_path_buf(),
            writers,
            lengths: vec![0; shard_count],
            in_memory,
        })
    }

    fn shard_path(folder: &Path, shard: usize) -> PathBuf {
        folder.join(format!("shard-{:04}.cbor", shard))
    }

    /// Path of the spill file for a shard
    pub fn path(&self, shard: usize) -> PathBuf {
        Self::shard_path(&self.folder, shard)
    }

    /// Number of keys spilled to a shard
    pub fn shard_len(&self, shard: usize) -> usize {
        self.lengths.get(shard).copied().unwrap_or(0)
    }
}

impl<K: Serialize + DeserializeOwned + 'static> ShardStore<K> for SpillShardStore {
    fn shard_count(&self) -> usize {
        self.writers.len()
    }

    fn append(&mut self, shard: usize, key: K) -> Result<()> {
        check_shard(shard, self.writers.len())?;
        ciborium::ser::into_writer(&key, &mut self.writers[shard])
            .map_err(|e| HeapError::Serialization(format!("{:?}", e)))?;
        self.lengths[shard] += 1;
        Ok(())
    }

    fn seal(&mut self) -> Result<()> {
        for writer in self.writers.iter_mut() {
            writer.flush()?;
        }
        debug!("Spill files flushed ({:?} keys per shard)", self.lengths);
        Ok(())
    }

    fn keys(&self, shard: usize) -> Result<ShardKeys<'_, K>> {
        check_shard(shard, self.writers.len())?;

        let buffer = open_buffer(&self.path(shard), self.in_memory)?;
        debug!(
            "Reading {} keys from shard {} ({} bytes)",
            self.lengths[shard],
            shard,
            buffer.data().len()
        );
        Ok(Box::new(SpillKeys::new(buffer)))
    }
}

/// Decodes the CBOR records of a spill file one at a time
struct SpillKeys<K> {
    buffer: Box<dyn Buffer>,
    offset: usize,
    failed: bool,
    _marker: PhantomData<fn() -> K>,
}

impl<K> SpillKeys<K> {
    fn new(buffer: Box<dyn Buffer>) -> Self {
        Self {
            buffer,
            offset: 0,
            failed: false,
            _marker: PhantomData,
        }
    }
}

impl<K: DeserializeOwned> Iterator for SpillKeys<K> {
    type Item = Result<K>;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.buffer.data();
        if self.failed || self.offset >= data.len() {
            return None;
        }

        let mut reader = &data[self.offset..];
        let remaining = reader.len();
        match ciborium::de::from_reader(&mut reader) {
            Ok(key) => {
                self.offset += remaining - reader.len();
                Some(Ok(key))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(HeapError::Serialization(format!(
                    "record at byte {}: {:?}",
                    self.offset, e
                ))))
            }
        }
    }
}
