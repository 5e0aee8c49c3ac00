pub mod compute;

use nexus_db::models::Draw;

use crate::config::FeatureSet;

pub type FeatureVector = Vec<f64>;

/// Un vecteur par tirage, dans l'ordre d'entrée.
pub fn extract(draws: &[Draw], set: FeatureSet) -> Vec<FeatureVector> {
    draws.iter().map(|d| compute::draw_features(d, set)).collect()
}

/// Concatène les vecteurs de tirages consécutifs (ordre de la série) : longueur W × F.
pub fn window_vector(window: &[Draw], set: FeatureSet) -> FeatureVector {
    let mut v = Vec::with_capacity(window.len() * set.len());
    for draw in window {
        v.extend(compute::draw_features(draw, set));
    }
    v
}
