use chrono::Datelike;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nexus_db::models::{MAX_NUMBER, MIN_NUMBER};

/// Génère un seed déterministe basé sur la date du jour (YYYYMMDD).
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Complète `selection` avec des numéros tirés uniformément, distincts, jusqu'à `target` éléments.
pub fn fill_random<R: Rng + ?Sized>(selection: &mut Vec<u8>, target: usize, rng: &mut R) {
    let available = (MAX_NUMBER - MIN_NUMBER + 1) as usize;
    let target = target.min(available);
    while selection.len() < target {
        let n = rng.random_range(MIN_NUMBER..=MAX_NUMBER);
        if !selection.contains(&n) {
            selection.push(n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_seed_format() {
        let seed = date_seed();
        let s = seed.to_string();
        assert_eq!(s.len(), 8, "seed devrait avoir 8 chiffres: {s}");
    }

    #[test]
    fn test_fill_random_distinct_in_range() {
        let mut rng = seeded_rng(Some(42));
        for _ in 0..50 {
            let mut selection = vec![7, 8];
            fill_random(&mut selection, 6, &mut rng);
            assert_eq!(selection.len(), 6);
            assert_eq!(&selection[..2], &[7, 8]);
            let mut sorted = selection.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), 6);
            assert!(selection.iter().all(|&n| (1..=45).contains(&n)));
        }
    }

    #[test]
    fn test_fill_random_noop_when_full() {
        let mut rng = seeded_rng(Some(1));
        let mut selection = vec![1, 2, 3, 4, 5, 6];
        fill_random(&mut selection, 6, &mut rng);
        assert_eq!(selection, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_seeded_rng_deterministic() {
        let a: Vec<u8> = {
            let mut rng = seeded_rng(Some(7));
            (0..10).map(|_| rng.random_range(1..=45)).collect()
        };
        let b: Vec<u8> = {
            let mut rng = seeded_rng(Some(7));
            (0..10).map(|_| rng.random_range(1..=45)).collect()
        };
        assert_eq!(a, b);
    }
}
