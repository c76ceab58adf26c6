use rand::RngCore;
use rand_distr::{Distribution, Zipf};
use std::collections::HashMap;

use heap_select::base::{Count, KeyCount};

/// A keyword search log with its exact frequency table
pub struct KeywordLog {
    pub keywords: Vec<String>,
    pub frequencies: HashMap<String, Count>,
}

impl KeywordLog {
    /// Draws `length` keywords from a Zipf distribution over
    /// `vocabulary_size` keywords
    pub fn new(vocabulary_size: u64, length: usize, exponent: f64, rng: &mut dyn RngCore) -> Self {
        let zipf = Zipf::new(vocabulary_size, exponent).unwrap();
        let mut keywords = Vec::with_capacity(length);
        let mut frequencies = HashMap::new();

        for _ in 0..length {
            let keyword = format!("kw{}", zipf.sample(rng) as u64);
            *frequencies.entry(keyword.clone()).or_insert(0) += 1;
            keywords.push(keyword);
        }

        Self {
            keywords,
            frequencies,
        }
    }

    /// The expected top-k, most frequent first (ties broken on the key)
    pub fn expected_top_k(&self, k: usize) -> Vec<KeyCount<String>> {
        let mut all: Vec<KeyCount<String>> = self
            .frequencies
            .iter()
            .map(|(key, count)| KeyCount::new(key.clone(), *count))
            .collect();
        all.sort_by(|a, b| b.cmp(a));
        all.truncate(k);
        all
    }
}
