use rand::Rng;
use rand::seq::IndexedRandom;

use nexus_db::models::{Draw, GeneratedGame, PICK_COUNT};

use crate::config::{EngineConfig, Strategy};
use crate::error::Result;
use crate::generator::{Recommendation, draw_frequencies, format_numbers, rank_by_frequency, count_numbers};
use crate::sampler::fill_random;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinementParams {
    pub mutation_rate: f64,
    pub hot_pool_size: usize,
}

impl RefinementParams {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            mutation_rate: config.mutation_rate,
            hot_pool_size: config.hot_pool_size,
        }
    }
}

/// Les 6 numéros les plus fréquents du pool, complétés au hasard si le pool est trop pauvre.
pub fn base_selection<R: Rng + ?Sized>(pool: &[u8], rng: &mut R) -> Vec<u8> {
    let ranked = rank_by_frequency(&count_numbers(pool.iter().copied()));
    let mut selection: Vec<u8> = ranked.into_iter().take(PICK_COUNT).collect();
    fill_random(&mut selection, PICK_COUNT, rng);
    selection
}

/// Raffinement par fréquence : sélection de base, puis mutation vers les numéros chauds
/// de la fenêtre de tendance. Un numéro déjà chaud n'est jamais remplacé.
pub fn refine<R: Rng + ?Sized>(
    pool: &[u8],
    trend: &[Draw],
    params: &RefinementParams,
    rng: &mut R,
) -> Result<GeneratedGame> {
    let mut selection = base_selection(pool, rng);

    let hot_counts = draw_frequencies(trend);
    let hot: Vec<u8> = rank_by_frequency(&hot_counts)
        .into_iter()
        .take(params.hot_pool_size)
        .collect();

    for slot in 0..selection.len() {
        if hot_counts[selection[slot] as usize] > 0 {
            continue;
        }
        if !rng.random_bool(params.mutation_rate) {
            continue;
        }
        if let Some(&replacement) = hot.choose(rng) {
            if !selection.contains(&replacement) {
                selection[slot] = replacement;
            }
        }
    }

    Ok(GeneratedGame::new(&selection)?)
}

pub fn recommend<R: Rng + ?Sized>(
    pool: &[u8],
    trend: &[Draw],
    params: &RefinementParams,
    rng: &mut R,
) -> Result<Recommendation> {
    let game = refine(pool, trend, params, rng)?;
    let hot: Vec<u8> = rank_by_frequency(&draw_frequencies(trend)).into_iter().take(3).collect();
    Ok(Recommendation::new(Strategy::Refinement, game)
        .with_annotation(format!("tendance : {}", format_numbers(&hot))))
}
