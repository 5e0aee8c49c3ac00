use std::collections::HashSet;

use nexus_db::models::Draw;
use nexus_db::{merge_draws, DrawStore};

use crate::calendar::expected_latest_round_now;
use crate::config::{EngineConfig, FetchMode};
use crate::error::{NexusError, Result};
use crate::remote::{DrawSource, RoundOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub requested: u32,
    pub new_draws: usize,
    pub skipped: u32,
}

/// Historique exploitable : tirages du plus récent au plus ancien, numéros uniques.
#[derive(Debug, Clone)]
pub struct HistorySeries {
    draws: Vec<Draw>,
    next_round: u32,
    expected_round: u32,
    stats: FetchStats,
}

impl HistorySeries {
    /// Trie (plus récent d'abord), dédoublonne et coupe à `retention` tirages.
    pub fn from_draws(mut draws: Vec<Draw>, retention: usize) -> Self {
        draws.sort_by(|a, b| b.round().cmp(&a.round()));
        draws.dedup_by_key(|d| d.round());
        draws.truncate(retention);
        let latest = draws.first().map(|d| d.round()).unwrap_or(0);
        Self {
            draws,
            next_round: latest + 1,
            expected_round: latest,
            stats: FetchStats::default(),
        }
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn latest(&self) -> Option<&Draw> {
        self.draws.first()
    }

    /// Premier tirage manquant après la frontière de collecte.
    pub fn next_round(&self) -> u32 {
        self.next_round
    }

    pub fn expected_round(&self) -> u32 {
        self.expected_round
    }

    pub fn stats(&self) -> &FetchStats {
        &self.stats
    }
}

/// Premier numéro absent en remontant depuis `boundary`.
fn contiguous_next(draws: &[Draw], boundary: u32) -> u32 {
    let rounds: HashSet<u32> = draws.iter().map(|d| d.round()).collect();
    let mut round = boundary;
    while rounds.contains(&(round + 1)) {
        round += 1;
    }
    round + 1
}

/// Historique adossé à une source distante et à un cache local.
pub struct HistoryStore<S, C> {
    source: S,
    store: C,
    mode: FetchMode,
    min_required: usize,
}

impl<S: DrawSource, C: DrawStore> HistoryStore<S, C> {
    pub fn new(source: S, store: C, mode: FetchMode, min_required: usize) -> Self {
        Self { source, store, mode, min_required }
    }

    pub fn from_config(source: S, store: C, config: &EngineConfig) -> Self {
        Self::new(source, store, config.fetch.mode, config.min_required_draws())
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    /// Met à jour le cache jusqu'au tirage attendu aujourd'hui.
    pub fn fetch(&self, target_depth: usize) -> Result<HistorySeries> {
        self.fetch_until(target_depth, expected_latest_round_now())
    }

    pub fn fetch_until(&self, target_depth: usize, expected_round: u32) -> Result<HistorySeries> {
        let cached = self.store.load()?;

        let (fresh, boundary, stats) = match self.mode {
            FetchMode::Incremental => self.scan_forward(&cached, target_depth, expected_round),
            FetchMode::Backward => self.scan_backward(&cached, target_depth, expected_round),
        };

        let merged = if fresh.is_empty() {
            cached
        } else {
            let merged = merge_draws(&cached, &fresh);
            self.store.save(&merged)?;
            log::info!("{} nouveaux tirages enregistrés dans {}", fresh.len(), self.store.location());
            merged
        };

        let next_round = contiguous_next(&merged, boundary);
        let mut series = HistorySeries::from_draws(merged, target_depth);
        series.next_round = next_round;
        series.expected_round = expected_round;
        series.stats = stats;

        self.ensure_viable(series)
    }

    /// Historique construit depuis le cache seul, sans aucune requête.
    pub fn load_cached(&self, target_depth: usize) -> Result<HistorySeries> {
        let cached = self.store.load()?;
        self.ensure_viable(HistorySeries::from_draws(cached, target_depth))
    }

    fn ensure_viable(&self, series: HistorySeries) -> Result<HistorySeries> {
        if series.len() < self.min_required {
            return Err(NexusError::DataUnavailable {
                available: series.len(),
                required: self.min_required,
            });
        }
        Ok(series)
    }

    fn request(&self, round: u32, fresh: &mut Vec<Draw>, stats: &mut FetchStats) -> bool {
        stats.requested += 1;
        match self.source.fetch_round(round) {
            RoundOutcome::Drawn(draw) => {
                fresh.push(draw);
                stats.new_draws += 1;
                true
            }
            RoundOutcome::NotYetDrawn => {
                log::debug!("Tirage {} pas encore disponible", round);
                stats.skipped += 1;
                false
            }
            RoundOutcome::Transient(reason) => {
                log::debug!("Tirage {} ignoré : {}", round, reason);
                stats.skipped += 1;
                false
            }
        }
    }

    /// Mode incrémental : uniquement les tirages postérieurs au plus récent du cache.
    fn scan_forward(&self, cached: &[Draw], target_depth: usize, expected: u32) -> (Vec<Draw>, u32, FetchStats) {
        let depth = u32::try_from(target_depth).unwrap_or(u32::MAX);
        let last_saved = cached
            .iter()
            .map(|d| d.round())
            .max()
            .unwrap_or_else(|| expected.saturating_sub(depth));

        let mut fresh = Vec::new();
        let mut stats = FetchStats::default();
        for round in (last_saved + 1)..=expected {
            self.request(round, &mut fresh, &mut stats);
        }
        (fresh, last_saved, stats)
    }

    /// Mode rétrograde : du tirage attendu vers le passé jusqu'à `target_depth` tirages connus.
    fn scan_backward(&self, cached: &[Draw], target_depth: usize, expected: u32) -> (Vec<Draw>, u32, FetchStats) {
        let known: HashSet<u32> = cached.iter().map(|d| d.round()).collect();
        let mut fresh = Vec::new();
        let mut stats = FetchStats::default();
        let mut collected = 0usize;
        let mut round = expected;

        while collected < target_depth && round > 0 {
            if known.contains(&round) || self.request(round, &mut fresh, &mut stats) {
                collected += 1;
            }
            round -= 1;
        }
        (fresh, round, stats)
    }
}
