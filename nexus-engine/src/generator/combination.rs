use rand::Rng;
use rand::seq::IndexedRandom;

use nexus_db::models::{Draw, GeneratedGame, MAX_NUMBER, MIN_NUMBER, PICK_COUNT};

use crate::config::{EngineConfig, Strategy};
use crate::error::Result;
use crate::generator::{Recommendation, draw_frequencies, format_numbers, rank_by_frequency};
use crate::sampler::fill_random;

const HOT_LIST_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinationParams {
    pub frequency_window: usize,
    pub core_size: usize,
    pub satellite_size: usize,
}

impl CombinationParams {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            frequency_window: config.frequency_window,
            core_size: config.core_size,
            satellite_size: config.satellite_size,
        }
    }
}

/// Noyau fixe + satellites : chaque grille reprend le noyau et complète avec
/// une combinaison de satellites.
#[derive(Debug, Clone)]
pub struct CoreSatellitePlan {
    pub core: Vec<u8>,
    pub satellites: Vec<u8>,
    pub games: Vec<GeneratedGame>,
}

impl CoreSatellitePlan {
    pub fn recommendations(&self) -> Vec<Recommendation> {
        let annotation = format!("noyau : {}", format_numbers(&self.core));
        self.games
            .iter()
            .map(|g| Recommendation::new(Strategy::Combination, g.clone()).with_annotation(annotation.clone()))
            .collect()
    }
}

/// Toutes les combinaisons de `k` éléments, en ordre lexicographique.
pub fn combinations(items: &[u8], k: usize) -> Vec<Vec<u8>> {
    fn walk(items: &[u8], k: usize, start: usize, current: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..items.len() {
            current.push(items[i]);
            walk(items, k, i + 1, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    if k <= items.len() {
        walk(items, k, 0, &mut Vec::with_capacity(k), &mut out);
    }
    out
}

pub fn generate<R: Rng + ?Sized>(draws: &[Draw], params: &CombinationParams, rng: &mut R) -> Result<CoreSatellitePlan> {
    let recent = &draws[..params.frequency_window.min(draws.len())];
    let mut hot: Vec<u8> = rank_by_frequency(&draw_frequencies(recent))
        .into_iter()
        .take(HOT_LIST_SIZE)
        .collect();
    fill_random(&mut hot, params.core_size, rng);

    let mut core: Vec<u8> = hot.choose_multiple(rng, params.core_size).copied().collect();
    core.sort_unstable();

    let others: Vec<u8> = (MIN_NUMBER..=MAX_NUMBER).filter(|n| !core.contains(n)).collect();
    let mut satellites: Vec<u8> = others.choose_multiple(rng, params.satellite_size).copied().collect();
    satellites.sort_unstable();

    let games = combinations(&satellites, PICK_COUNT - params.core_size)
        .into_iter()
        .map(|combo| {
            let numbers: Vec<u8> = core.iter().chain(combo.iter()).copied().collect();
            GeneratedGame::new(&numbers)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    log::debug!("noyau {:?}, satellites {:?}, {} grilles", core, satellites, games.len());
    Ok(CoreSatellitePlan { core, satellites, games })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_test_draws;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params() -> CombinationParams {
        CombinationParams { frequency_window: 15, core_size: 3, satellite_size: 5 }
    }

    #[test]
    fn test_combinations_count() {
        assert_eq!(combinations(&[1, 2, 3, 4, 5], 3).len(), 10);
        assert_eq!(combinations(&[1, 2, 3, 4, 5], 0), vec![Vec::<u8>::new()]);
        assert!(combinations(&[1, 2], 3).is_empty());
        assert_eq!(combinations(&[1, 2, 3], 2), vec![vec![1, 2], vec![1, 3], vec![2, 3]]);
    }

    #[test]
    fn test_core_in_every_game() {
        let draws = make_test_draws(40);
        let mut rng = StdRng::seed_from_u64(42);
        let plan = generate(&draws, &params(), &mut rng).unwrap();

        assert_eq!(plan.core.len(), 3);
        assert_eq!(plan.satellites.len(), 5);
        assert_eq!(plan.games.len(), 10);
        assert!(plan.satellites.iter().all(|s| !plan.core.contains(s)));
        for game in &plan.games {
            assert!(plan.core.iter().all(|&c| game.contains(c)));
        }
    }

    #[test]
    fn test_each_satellite_in_six_games() {
        let draws = make_test_draws(40);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = generate(&draws, &params(), &mut rng).unwrap();
            for &s in &plan.satellites {
                let count = plan.games.iter().filter(|g| g.contains(s)).count();
                assert_eq!(count, 6, "satellite {s}");
            }
            let mut unique = plan.games.clone();
            unique.dedup();
            assert_eq!(unique.len(), 10);
        }
    }

    #[test]
    fn test_core_comes_from_hot_numbers() {
        let draws: Vec<Draw> = (0..15)
            .map(|i| Draw::new(15 - i, [1, 2, 3, 4, 5, 6]).unwrap())
            .collect();
        let mut rng = StdRng::seed_from_u64(9);
        let plan = generate(&draws, &params(), &mut rng).unwrap();
        assert!(plan.core.iter().all(|&c| (1..=6).contains(&c)));
    }

    #[test]
    fn test_empty_history_is_padded() {
        let mut rng = StdRng::seed_from_u64(1);
        let plan = generate(&[], &params(), &mut rng).unwrap();
        assert_eq!(plan.core.len(), 3);
        assert_eq!(plan.games.len(), 10);
    }

    #[test]
    fn test_recommendations_annotated() {
        let draws = make_test_draws(20);
        let mut rng = StdRng::seed_from_u64(5);
        let plan = generate(&draws, &params(), &mut rng).unwrap();
        let recs = plan.recommendations();
        assert_eq!(recs.len(), 10);
        let expected = format!("noyau : {}", format_numbers(&plan.core));
        assert!(recs.iter().all(|r| r.strategy == Strategy::Combination && r.annotation.as_deref() == Some(expected.as_str())));
    }
}
