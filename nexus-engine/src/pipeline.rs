use rand::Rng;

use nexus_db::models::Draw;

use crate::config::{EngineConfig, Strategy};
use crate::error::Result;
use crate::generator::combination::{self, CombinationParams, CoreSatellitePlan};
use crate::generator::refinement::{self, RefinementParams};
use crate::generator::{Recommendation, momentum, projection};
use crate::history::HistorySeries;
use crate::search::{PatternSearchEngine, SearchCandidate, rank_candidates};

/// Résultat complet d'une analyse : recherche de motifs et grilles par stratégie.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub latest_round: u32,
    pub next_round: u32,
    pub history_len: usize,
    /// Scores bruts, dans l'ordre des offsets.
    pub scan: Vec<SearchCandidate>,
    /// Les `ensemble_size` meilleurs candidats.
    pub matches: Vec<SearchCandidate>,
    pub recommendations: Vec<Recommendation>,
    pub plan: Option<CoreSatellitePlan>,
}

impl AnalysisReport {
    pub fn best_match(&self) -> Option<&SearchCandidate> {
        self.matches.first()
    }

    pub fn by_strategy(&self, strategy: Strategy) -> impl Iterator<Item = &Recommendation> {
        self.recommendations.iter().filter(move |r| r.strategy == strategy)
    }

    /// Meilleure projection et première grille momentum.
    pub fn top_picks(&self) -> Vec<&Recommendation> {
        [Strategy::Projection, Strategy::Momentum]
            .into_iter()
            .filter_map(|s| self.by_strategy(s).next())
            .collect()
    }
}

pub fn analyze<R: Rng + ?Sized>(history: &HistorySeries, config: &EngineConfig, rng: &mut R) -> Result<AnalysisReport> {
    let mut report = analyze_draws(history.draws(), config, rng)?;
    report.next_round = history.next_round();
    Ok(report)
}

/// Analyse sur une série déjà ordonnée du plus récent au plus ancien.
pub fn analyze_draws<R: Rng + ?Sized>(draws: &[Draw], config: &EngineConfig, rng: &mut R) -> Result<AnalysisReport> {
    config.validate()?;

    let engine = PatternSearchEngine::from_config(config);
    let scan = engine.scan(draws)?;
    let mut matches = rank_candidates(scan.clone());
    matches.truncate(config.ensemble_size);

    let strategy = config.strategy;
    let mut recommendations = Vec::new();

    if strategy.includes(Strategy::Projection) {
        for g in 0..config.games_per_run {
            let candidate = &matches[g % matches.len()];
            recommendations.extend(projection::project(draws, candidate));
        }
    }

    if strategy.includes(Strategy::Refinement) {
        let pool = projection::projected_pool(draws, &matches);
        let trend = &draws[..config.trend_window.min(draws.len())];
        let params = RefinementParams::from_config(config);
        for _ in 0..config.games_per_run {
            recommendations.push(refinement::recommend(&pool, trend, &params, rng)?);
        }
    }

    if strategy.includes(Strategy::Momentum) {
        for _ in 0..config.games_per_run {
            recommendations.push(momentum::recommend(draws, &config.momentum, rng)?);
        }
    }

    let plan = if strategy.includes(Strategy::Combination) {
        let plan = combination::generate(draws, &CombinationParams::from_config(config), rng)?;
        recommendations.extend(plan.recommendations());
        Some(plan)
    } else {
        None
    };

    log::info!(
        "{} grilles générées ({}) sur {} tirages",
        recommendations.len(),
        strategy.label(),
        draws.len()
    );

    let latest_round = draws.first().map(|d| d.round()).unwrap_or(0);
    Ok(AnalysisReport {
        latest_round,
        next_round: latest_round + 1,
        history_len: draws.len(),
        scan,
        matches,
        recommendations,
        plan,
    })
}
