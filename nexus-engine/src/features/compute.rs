use std::collections::HashSet;

use nexus_db::models::{Draw, MAX_NUMBER, MIN_NUMBER, PICK_COUNT};

use crate::config::FeatureSet;

/// 45 + 44 + ... + 40
pub const SUM_DIVISOR: f64 = 255.0;
pub const RANGE_DIVISOR: f64 = (MAX_NUMBER - MIN_NUMBER) as f64;
/// Une grille de 6 numéros a au moins 5 écarts distincts.
const COMPLEXITY_OFFSET: usize = PICK_COUNT - 1;
const COMPLEXITY_DIVISOR: f64 = 10.0;

pub fn draw_features(draw: &Draw, set: FeatureSet) -> Vec<f64> {
    let nums = draw.numbers();
    let mut features = vec![sum_ratio(nums), range_ratio(nums), odd_ratio(nums)];
    if set == FeatureSet::Weighted {
        features.push(complexity_ratio(nums));
    }
    features
}

pub fn sum_ratio(nums: &[u8]) -> f64 {
    nums.iter().map(|&n| n as f64).sum::<f64>() / SUM_DIVISOR
}

/// Suppose `nums` trié.
pub fn range_ratio(nums: &[u8]) -> f64 {
    match (nums.first(), nums.last()) {
        (Some(&lo), Some(&hi)) => (hi - lo) as f64 / RANGE_DIVISOR,
        _ => 0.0,
    }
}

pub fn odd_ratio(nums: &[u8]) -> f64 {
    let odd = nums.iter().filter(|&&n| n % 2 == 1).count();
    odd as f64 / PICK_COUNT as f64
}

/// Nombre d'écarts positifs distincts entre paires (valeur AC brute + 5).
pub fn distinct_differences(nums: &[u8]) -> usize {
    let mut diffs = HashSet::new();
    for i in 0..nums.len() {
        for j in (i + 1)..nums.len() {
            diffs.insert(nums[j].abs_diff(nums[i]));
        }
    }
    diffs.remove(&0);
    diffs.len()
}

pub fn complexity_ratio(nums: &[u8]) -> f64 {
    distinct_differences(nums).saturating_sub(COMPLEXITY_OFFSET) as f64 / COMPLEXITY_DIVISOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{extract, window_vector};
    use crate::make_test_draws;

    #[test]
    fn test_known_values() {
        let draw = Draw::new(1, [1, 2, 3, 4, 5, 6]).unwrap();
        let f = draw_features(&draw, FeatureSet::Weighted);
        assert!((f[0] - 21.0 / 255.0).abs() < 1e-12);
        assert!((f[1] - 5.0 / 44.0).abs() < 1e-12);
        assert!((f[2] - 0.5).abs() < 1e-12);
        // Progression arithmétique : 5 écarts distincts, complexité nulle
        assert_eq!(distinct_differences(draw.numbers()), 5);
        assert_eq!(f[3], 0.0);
    }

    #[test]
    fn test_feature_count() {
        let draw = Draw::new(1, [3, 11, 19, 25, 37, 44]).unwrap();
        assert_eq!(draw_features(&draw, FeatureSet::Basic).len(), 3);
        assert_eq!(draw_features(&draw, FeatureSet::Weighted).len(), 4);
    }

    #[test]
    fn test_max_complexity() {
        // Règle de Golomb : 15 écarts tous distincts
        let draw = Draw::new(1, [1, 2, 5, 11, 19, 30]).unwrap();
        assert_eq!(distinct_differences(draw.numbers()), 15);
        assert!((complexity_ratio(draw.numbers()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ranges_hold_for_many_draws() {
        let draws = make_test_draws(500);
        for v in extract(&draws, FeatureSet::Weighted) {
            assert!(v[0] > 0.0 && v[0] <= 1.0, "sum_ratio = {}", v[0]);
            assert!(v[1] > 0.0 && v[1] <= 1.0, "range_ratio = {}", v[1]);
            assert!((0.0..=1.0).contains(&v[2]), "odd_ratio = {}", v[2]);
            assert!((0.0..=1.0).contains(&v[3]), "complexity_ratio = {}", v[3]);
        }
    }

    #[test]
    fn test_extreme_draws_in_range() {
        let high = Draw::new(1, [40, 41, 42, 43, 44, 45]).unwrap();
        let f = draw_features(&high, FeatureSet::Weighted);
        assert!((f[0] - 1.0).abs() < 1e-12);
        let wide = Draw::new(2, [1, 9, 17, 28, 36, 45]).unwrap();
        assert!((draw_features(&wide, FeatureSet::Basic)[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_vector_concatenates_in_order() {
        let draws = make_test_draws(10);
        let v = window_vector(&draws, FeatureSet::Basic);
        assert_eq!(v.len(), 30);
        let second = draw_features(&draws[1], FeatureSet::Basic);
        assert_eq!(&v[3..6], second.as_slice());
    }
}
