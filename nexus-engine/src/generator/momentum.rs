use rand::Rng;
use rand::seq::IndexedRandom;

use nexus_db::models::{Draw, GeneratedGame, MAX_NUMBER, MIN_NUMBER, PICK_COUNT};

use crate::config::{MomentumConfig, Strategy};
use crate::error::Result;
use crate::generator::Recommendation;

/// Score d'élan par numéro (index 0 inutilisé).
///
/// Poids linéaire `(window - i) * weight_step` pour chaque apparition dans les `window`
/// derniers tirages, plus un bonus d'écart `gap * gap_weight` pour les numéros dont la
/// dernière sortie, dans les `gap_window` derniers tirages, remonte à plus de `gap_threshold`.
/// Un numéro absent de toute la fenêtre d'écart ne reçoit pas de bonus.
pub fn momentum_scores(draws: &[Draw], config: &MomentumConfig) -> Vec<f64> {
    let mut scores = vec![0.0f64; MAX_NUMBER as usize + 1];

    for (i, draw) in draws.iter().take(config.window).enumerate() {
        let weight = (config.window - i) as f64 * config.weight_step;
        for &n in draw.numbers() {
            scores[n as usize] += weight;
        }
    }

    let mut last_seen: Vec<Option<usize>> = vec![None; MAX_NUMBER as usize + 1];
    for (i, draw) in draws.iter().take(config.gap_window).enumerate() {
        for &n in draw.numbers() {
            last_seen[n as usize].get_or_insert(i);
        }
    }
    for n in MIN_NUMBER..=MAX_NUMBER {
        if let Some(gap) = last_seen[n as usize] {
            if gap > config.gap_threshold {
                scores[n as usize] += gap as f64 * config.gap_weight;
            }
        }
    }

    scores
}

/// Les `pool_size` meilleurs numéros, score décroissant puis numéro croissant.
pub fn momentum_pool(scores: &[f64], pool_size: usize) -> Vec<u8> {
    let mut ranked: Vec<u8> = (MIN_NUMBER..=MAX_NUMBER).collect();
    ranked.sort_by(|&a, &b| {
        scores[b as usize]
            .partial_cmp(&scores[a as usize])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    ranked.truncate(pool_size);
    ranked
}

pub fn generate<R: Rng + ?Sized>(draws: &[Draw], config: &MomentumConfig, rng: &mut R) -> Result<GeneratedGame> {
    let pool = momentum_pool(&momentum_scores(draws, config), config.pool_size);
    let picked: Vec<u8> = pool.choose_multiple(rng, PICK_COUNT).copied().collect();
    Ok(GeneratedGame::new(&picked)?)
}

pub fn recommend<R: Rng + ?Sized>(draws: &[Draw], config: &MomentumConfig, rng: &mut R) -> Result<Recommendation> {
    let game = generate(draws, config, rng)?;
    Ok(Recommendation::new(Strategy::Momentum, game)
        .with_annotation(format!("élan : top {} pondéré", config.pool_size)))
}
