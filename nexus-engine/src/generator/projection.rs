use nexus_db::models::{Draw, GeneratedGame};

use crate::config::Strategy;
use crate::generator::Recommendation;
use crate::search::SearchCandidate;

/// Index du tirage projeté pour une fenêtre trouvée à `offset` : celui qui l'a suivi.
/// Un offset 0 n'a pas de successeur, on se rabat sur `offset + 1`.
pub fn projection_index(offset: usize, len: usize) -> Option<usize> {
    let index = if offset == 0 { offset + 1 } else { offset - 1 };
    (index < len).then_some(index)
}

/// Projection directe : le tirage qui a suivi la fenêtre similaire.
pub fn project(draws: &[Draw], candidate: &SearchCandidate) -> Option<Recommendation> {
    let index = projection_index(candidate.offset, draws.len())?;
    let target = draws.get(candidate.offset)?;
    let game = GeneratedGame::from(&draws[index]);
    Some(Recommendation::new(Strategy::Projection, game).with_annotation(format!(
        "cible : tirage {} (similarité {:.1}%)",
        target.round(),
        candidate.score * 100.0
    )))
}

/// Numéros des tirages projetés pour chaque candidat, dans l'ordre du classement.
pub fn projected_pool(draws: &[Draw], candidates: &[SearchCandidate]) -> Vec<u8> {
    candidates
        .iter()
        .filter_map(|c| projection_index(c.offset, draws.len()))
        .flat_map(|i| draws[i].numbers().iter().copied())
        .collect()
}
