use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::collections::HashMap;
use std::hash::Hash;

use heap_select::base::Direction;
use heap_select::sort::sorted;

/// Seeded generator, or a random one if no seed is given
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_entropy()
    }
}

/// Random values in `0..max_value` (small ranges give many duplicates)
pub fn random_vec(length: usize, max_value: u32, rng: &mut dyn RngCore) -> Vec<u32> {
    (0..length).map(|_| rng.gen_range(0..max_value)).collect()
}

/// `count` sorted runs of at most `max_length` elements; some runs are empty
pub fn sorted_runs(
    count: usize,
    max_length: usize,
    max_value: u32,
    direction: Direction,
    rng: &mut dyn RngCore,
) -> Vec<Vec<u32>> {
    (0..count)
        .map(|_| {
            let length = rng.gen_range(0..=max_length);
            sorted(random_vec(length, max_value, rng), direction)
        })
        .collect()
}

/// True if the values are in extraction order for the direction
pub fn is_sorted<T: Ord>(values: &[T], direction: Direction) -> bool {
    values
        .windows(2)
        .all(|w| !direction.precedes(&w[1], &w[0]))
}

/// Number of occurrences of each value
pub fn multiset<T: Hash + Eq + Clone>(values: &[T]) -> HashMap<T, usize> {
    let mut counts = HashMap::new();
    for v in values {
        *counts.entry(v.clone()).or_insert(0) += 1;
    }
    counts
}

/// Checks that `observed` is a valid top-k of `all`
///
/// Ties at the boundary can be broken arbitrarily, so the check does not
/// compare with one specific answer: it checks the size, that the selection
/// is drawn from the input, and that no rejected value beats a selected one.
pub fn check_top_k<T>(observed: &[T], all: &[T], k: usize, direction: Direction)
where
    T: Ord + Hash + Eq + Clone + std::fmt::Debug,
{
    assert_eq!(
        observed.len(),
        k.min(all.len()),
        "Expected {} elements",
        k.min(all.len())
    );

    let mut remaining = multiset(all);
    for v in observed {
        let c = remaining
            .get_mut(v)
            .unwrap_or_else(|| panic!("{:?} is not part of the input", v));
        assert!(*c > 0, "{:?} selected more often than it appears", v);
        *c -= 1;
    }

    if let Some(weakest) = observed
        .iter()
        .reduce(|a, b| if direction.precedes(a, b) { b } else { a })
    {
        for (v, c) in remaining.iter() {
            assert!(
                *c == 0 || !direction.precedes(v, weakest),
                "{:?} was rejected but beats the selected {:?}",
                v,
                weakest
            );
        }
    }
}
