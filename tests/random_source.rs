use crozier_lib::model::RandomSource;

#[test]
fn test_same_seed_same_stream() {
    let mut a = RandomSource::from_seed(2024);
    let mut b = RandomSource::from_seed(2024);
    for _ in 0..100 {
        assert_eq!(a.unit().to_bits(), b.unit().to_bits());
    }
    assert_eq!(a.seed(), 2024);
}

#[test]
fn test_weighted_index_follows_weights() {
    let mut rng = RandomSource::from_seed(11);
    let weights = [1.0, 0.0, 3.0];
    let mut counts = [0usize; 3];
    let draws = 20_000;
    for _ in 0..draws {
        counts[rng.weighted_index(&weights).unwrap()] += 1;
    }
    assert_eq!(counts[1], 0, "zero-weight slot must never be chosen");
    let share = counts[2] as f64 / draws as f64;
    assert!((share - 0.75).abs() < 0.02, "share of heaviest slot was {share}");
}

#[test]
fn test_weighted_index_rejects_degenerate_weights() {
    let mut rng = RandomSource::from_seed(12);
    assert!(rng.weighted_index(&[]).is_err());
    assert!(rng.weighted_index(&[0.0, 0.0]).is_err());
    assert!(rng.weighted_index(&[1.0, -1.0]).is_err());
    assert!(rng.weighted_index(&[f64::NAN]).is_err());
}

#[test]
fn test_random_subset_is_distinct_and_bounded() {
    let mut rng = RandomSource::from_seed(13);
    let items: Vec<u32> = (0..10).collect();
    let mut subset = rng.random_subset(&items, 4);
    assert_eq!(subset.len(), 4);
    subset.sort_unstable();
    subset.dedup();
    assert_eq!(subset.len(), 4);
    assert_eq!(rng.random_subset(&items, 50).len(), 10);
}

#[test]
fn test_exponential_mean() {
    let mut rng = RandomSource::from_seed(14);
    let n = 20_000;
    let mean = (0..n).map(|_| rng.exponential(2.0).unwrap()).sum::<f64>() / n as f64;
    assert!((mean - 0.5).abs() < 0.02, "mean was {mean}");
    assert!(rng.exponential(0.0).is_err());
}
