pub mod cache;
pub mod db;
pub mod models;

pub use rusqlite;

use anyhow::Result;
use std::collections::BTreeMap;

use crate::models::Draw;

/// Stockage durable des tirages, indexé par numéro de tirage.
pub trait DrawStore {
    /// Lit tout le stockage. Un stockage absent est vu comme vide.
    fn load(&self) -> Result<Vec<Draw>>;
    /// Réécrit entièrement le stockage.
    fn save(&self, draws: &[Draw]) -> Result<()>;
    fn location(&self) -> String;

    fn count(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    /// Plus grand numéro de tirage stocké.
    fn latest_round(&self) -> Result<Option<u32>> {
        Ok(self.load()?.iter().map(|d| d.round()).max())
    }
}

impl<T: DrawStore + ?Sized> DrawStore for Box<T> {
    fn load(&self) -> Result<Vec<Draw>> {
        (**self).load()
    }

    fn save(&self, draws: &[Draw]) -> Result<()> {
        (**self).save(draws)
    }

    fn location(&self) -> String {
        (**self).location()
    }

    fn count(&self) -> Result<usize> {
        (**self).count()
    }

    fn latest_round(&self) -> Result<Option<u32>> {
        (**self).latest_round()
    }
}

/// Fusionne deux listes de tirages par numéro de tirage.
/// Les tirages déjà connus gardent la priorité (append-only).
/// Résultat trié par numéro croissant.
pub fn merge_draws(existing: &[Draw], incoming: &[Draw]) -> Vec<Draw> {
    let mut by_round: BTreeMap<u32, Draw> = BTreeMap::new();
    for draw in existing {
        by_round.entry(draw.round()).or_insert_with(|| draw.clone());
    }
    for draw in incoming {
        by_round.entry(draw.round()).or_insert_with(|| draw.clone());
    }
    by_round.into_values().collect()
}
