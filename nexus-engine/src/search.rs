use std::cmp::Ordering;
use std::ops::Range;

use nexus_db::models::Draw;

use crate::config::{EngineConfig, FeatureSet};
use crate::error::{NexusError, Result};
use crate::features::window_vector;
use crate::similarity::SimilarityScorer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchCandidate {
    /// Index du premier tirage de la fenêtre passée dans l'historique (0 = plus récent).
    pub offset: usize,
    pub score: f64,
}

/// Offsets comparables pour un historique de `len` tirages : `W ..= len - W - 1`.
/// La fenêtre `[i, i + W)` est entièrement dans le passé et `i - 1` existe comme cible.
pub fn offset_range(len: usize, window: usize) -> Range<usize> {
    let end = len.saturating_sub(window).max(window);
    window..end
}

pub fn offset_count(len: usize, window: usize) -> usize {
    len.saturating_sub(2 * window)
}

/// Historique minimal pour qu'au moins un offset existe.
pub fn required_history(window: usize) -> usize {
    2 * window + 1
}

/// Classe par score décroissant ; le tri est stable, donc à égalité l'offset le plus récent reste devant.
pub fn rank_candidates(mut candidates: Vec<SearchCandidate>) -> Vec<SearchCandidate> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates
}

/// Recherche par fenêtre glissante du passé le plus proche de la fenêtre courante.
#[derive(Debug, Clone)]
pub struct PatternSearchEngine {
    window: usize,
    feature_set: FeatureSet,
    scorer: SimilarityScorer,
}

impl PatternSearchEngine {
    pub fn new(window: usize, feature_set: FeatureSet, scorer: SimilarityScorer) -> Self {
        Self { window, feature_set, scorer }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.window_size,
            config.feature_set,
            SimilarityScorer::new(config.feature_weights(), config.decay_strength),
        )
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Scores de tous les offsets, dans l'ordre des offsets.
    pub fn scan(&self, draws: &[Draw]) -> Result<Vec<SearchCandidate>> {
        let len = draws.len();
        if self.window == 0 || offset_count(len, self.window) == 0 {
            return Err(NexusError::InsufficientHistory {
                len,
                required: required_history(self.window.max(1)),
            });
        }

        let current = window_vector(&draws[..self.window], self.feature_set);

        let candidates = offset_range(len, self.window)
            .map(|offset| {
                let past = window_vector(&draws[offset..offset + self.window], self.feature_set);
                SearchCandidate {
                    offset,
                    score: self.scorer.score(&current, &past, offset, len),
                }
            })
            .collect();
        Ok(candidates)
    }

    /// Candidats classés par score décroissant ; à égalité, l'offset le plus récent d'abord.
    pub fn search(&self, draws: &[Draw]) -> Result<Vec<SearchCandidate>> {
        let ranked = rank_candidates(self.scan(draws)?);
        log::info!(
            "{} offsets comparés, meilleur : offset {} ({:.4})",
            ranked.len(),
            ranked[0].offset,
            ranked[0].score
        );
        Ok(ranked)
    }

    pub fn best_match(&self, draws: &[Draw]) -> Result<SearchCandidate> {
        let ranked = self.search(draws)?;
        Ok(ranked[0])
    }

    pub fn top_matches(&self, draws: &[Draw], k: usize) -> Result<Vec<SearchCandidate>> {
        let mut ranked = self.search(draws)?;
        ranked.truncate(k.max(1));
        Ok(ranked)
    }
}
