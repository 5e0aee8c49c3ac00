use serde::{Deserialize, Serialize};
use std::path::Path;

use nexus_db::models::{MAX_NUMBER, PICK_COUNT};

use crate::error::{NexusError, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.dhlottery.co.kr/common.do";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSet {
    /// somme, étendue, parité
    Basic,
    /// somme, étendue, parité, complexité AC
    Weighted,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        match self {
            FeatureSet::Basic => 3,
            FeatureSet::Weighted => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Ne demande que les tirages postérieurs au cache
    Incremental,
    /// Remonte tirage par tirage depuis le plus récent
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    All,
    Projection,
    Refinement,
    Momentum,
    Combination,
}

impl Strategy {
    pub fn includes(&self, other: Strategy) -> bool {
        *self == Strategy::All || *self == other
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::All => "Toutes",
            Strategy::Projection => "Projection",
            Strategy::Refinement => "Raffinement",
            Strategy::Momentum => "Momentum",
            Strategy::Combination => "Noyau/Satellites",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureWeights {
    pub sum: f64,
    pub range: f64,
    pub odd: f64,
    pub complexity: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            sum: 1.0,
            range: 1.5,
            odd: 0.5,
            complexity: 1.8,
        }
    }
}

impl FeatureWeights {
    /// Un poids par feature, dans l'ordre d'extraction.
    pub fn for_set(&self, set: FeatureSet) -> Vec<f64> {
        match set {
            FeatureSet::Basic => vec![self.sum, self.range, self.odd],
            FeatureSet::Weighted => vec![self.sum, self.range, self.odd, self.complexity],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub window: usize,
    pub weight_step: f64,
    pub gap_window: usize,
    pub gap_threshold: usize,
    pub gap_weight: f64,
    pub pool_size: usize,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            window: 10,
            weight_step: 1.5,
            gap_window: 50,
            gap_threshold: 10,
            gap_weight: 0.5,
            pool_size: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub mode: FetchMode,
    /// Tirages exigés en plus de la fenêtre d'analyse.
    pub min_margin: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 3,
            mode: FetchMode::Incremental,
            min_margin: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window_size: usize,
    pub history_depth: usize,
    pub ensemble_size: usize,
    pub feature_set: FeatureSet,
    pub weights: FeatureWeights,
    pub decay_strength: f64,
    pub games_per_run: usize,
    pub core_size: usize,
    pub satellite_size: usize,
    pub trend_window: usize,
    pub frequency_window: usize,
    pub mutation_rate: f64,
    pub hot_pool_size: usize,
    pub strategy: Strategy,
    pub momentum: MomentumConfig,
    pub fetch: FetchConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            history_depth: 300,
            ensemble_size: 3,
            feature_set: FeatureSet::Weighted,
            weights: FeatureWeights::default(),
            decay_strength: 0.10,
            games_per_run: 5,
            core_size: 3,
            satellite_size: 5,
            trend_window: 10,
            frequency_window: 15,
            mutation_rate: 0.4,
            hot_pool_size: 10,
            strategy: Strategy::All,
            momentum: MomentumConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Nombre minimal de tirages pour qu'une collecte soit exploitable.
    pub fn min_required_draws(&self) -> usize {
        self.window_size + self.fetch.min_margin
    }

    pub fn feature_weights(&self) -> Vec<f64> {
        self.weights.for_set(self.feature_set)
    }

    pub fn validate(&self) -> Result<()> {
        let pool = MAX_NUMBER as usize;
        let invalid = |msg: String| -> Result<()> { Err(NexusError::InvalidConfig(msg)) };

        if self.window_size == 0 {
            return invalid("window_size doit être > 0".into());
        }
        if self.history_depth < 2 * self.window_size + 1 {
            return invalid(format!(
                "history_depth ({}) trop petit pour une fenêtre de {}",
                self.history_depth, self.window_size
            ));
        }
        if self.ensemble_size == 0 || self.games_per_run == 0 {
            return invalid("ensemble_size et games_per_run doivent être > 0".into());
        }
        let weights = self.feature_weights();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || weights.iter().all(|w| *w == 0.0) {
            return invalid(format!("poids de features invalides : {:?}", weights));
        }
        if !(0.0..1.0).contains(&self.decay_strength) {
            return invalid(format!("decay_strength hors de [0, 1) : {}", self.decay_strength));
        }
        if self.core_size == 0 || self.core_size >= PICK_COUNT {
            return invalid(format!("core_size doit être entre 1 et {}", PICK_COUNT - 1));
        }
        if self.satellite_size < PICK_COUNT - self.core_size || self.core_size + self.satellite_size > pool {
            return invalid(format!(
                "satellite_size ({}) incompatible avec un noyau de {}",
                self.satellite_size, self.core_size
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return invalid(format!("mutation_rate hors de [0, 1] : {}", self.mutation_rate));
        }
        if self.trend_window == 0 || self.frequency_window == 0 || self.hot_pool_size == 0 {
            return invalid("trend_window, frequency_window et hot_pool_size doivent être > 0".into());
        }
        if self.momentum.window == 0 || self.momentum.pool_size < PICK_COUNT || self.momentum.pool_size > pool {
            return invalid(format!(
                "momentum.pool_size doit être entre {} et {}",
                PICK_COUNT, pool
            ));
        }
        if self.fetch.timeout_secs == 0 {
            return invalid("fetch.timeout_secs doit être > 0".into());
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_size, 10);
        assert_eq!(config.min_required_draws(), 30);
        assert_eq!(config.feature_weights(), vec![1.0, 1.5, 0.5, 1.8]);
    }

    #[test]
    fn test_basic_feature_weights() {
        let weights = FeatureWeights::default().for_set(FeatureSet::Basic);
        assert_eq!(weights, vec![1.0, 1.5, 0.5]);
        assert_eq!(FeatureSet::Basic.len(), 3);
        assert_eq!(FeatureSet::Weighted.len(), 4);
    }

    #[test]
    fn test_invalid_core_split() {
        let config = EngineConfig { core_size: 6, ..EngineConfig::default() };
        assert!(matches!(config.validate(), Err(NexusError::InvalidConfig(_))));

        let config = EngineConfig { core_size: 3, satellite_size: 2, ..EngineConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_depth_and_weights() {
        let config = EngineConfig { history_depth: 15, ..EngineConfig::default() };
        assert!(config.validate().is_err());
        let config = EngineConfig { history_depth: 20, ..EngineConfig::default() };
        assert!(config.validate().is_err());
        let config = EngineConfig { history_depth: 21, ..EngineConfig::default() };
        assert!(config.validate().is_ok());

        let weights = FeatureWeights { sum: 0.0, range: 0.0, odd: 0.0, complexity: 0.0 };
        let config = EngineConfig { weights, ..EngineConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_strategy_includes() {
        assert!(Strategy::All.includes(Strategy::Momentum));
        assert!(Strategy::Projection.includes(Strategy::Projection));
        assert!(!Strategy::Projection.includes(Strategy::Combination));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nexus.json");
        let config = EngineConfig { ensemble_size: 1, feature_set: FeatureSet::Basic, ..EngineConfig::default() };
        config.save(&path).unwrap();
        let restored = EngineConfig::load(&path).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"window_size": 8, "fetch": {"mode": "backward"}}"#).unwrap();
        assert_eq!(config.window_size, 8);
        assert_eq!(config.fetch.mode, FetchMode::Backward);
        assert_eq!(config.fetch.timeout_secs, 3);
        assert_eq!(config.games_per_run, 5);
    }
}
