use heap_select::base::Direction;
use heap_select::merge::merge;
use rstest::rstest;

use helpers::sequences::{is_sorted, multiset, seeded_rng, sorted_runs};

#[test]
fn test_scenario() {
    let merged: Vec<u32> = merge(vec![vec![1, 4, 8], vec![2, 3, 9]], Direction::Min).collect();
    assert_eq!(merged, vec![1, 2, 3, 4, 8, 9]);
}

#[rstest]
#[case(0, 10)]
#[case(1, 100)]
#[case(2, 0)]
#[case(10, 50)]
#[case(64, 200)]
fn test_merge_runs(
    #[case] run_count: usize,
    #[case] max_length: usize,
    #[values(Direction::Max, Direction::Min)] direction: Direction,
) {
    let mut rng = seeded_rng(Some(run_count as u64 + 1));
    let runs = sorted_runs(run_count, max_length, 100, direction, &mut rng);
    let all: Vec<u32> = runs.iter().flatten().copied().collect();

    let merged = merge(runs, direction);
    assert_eq!(merged.size_hint(), (all.len(), Some(all.len())));

    let merged: Vec<u32> = merged.collect();
    assert!(is_sorted(&merged, direction));
    assert_eq!(merged.len(), all.len());
    assert_eq!(multiset(&merged), multiset(&all));
}

#[test]
fn test_merge_iterators() {
    // Sources do not have to be materialized
    let sources = (1..=4).map(|step| (0..1000u64).step_by(step));
    let merged: Vec<u64> = merge(sources, Direction::Min).collect();
    assert_eq!(merged.len(), 1000 + 500 + 334 + 250);
    assert!(is_sorted(&merged, Direction::Min));
}
