pub mod combination;
pub mod momentum;
pub mod projection;
pub mod refinement;

use nexus_db::models::{Draw, GeneratedGame, MAX_NUMBER};

use crate::config::Strategy;

/// Table d'occurrences indexée par numéro (l'index 0 est inutilisé).
pub type Counts = [u32; MAX_NUMBER as usize + 1];

/// Grille proposée à l'affichage, avec la stratégie qui l'a produite.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub strategy: Strategy,
    pub game: GeneratedGame,
    pub annotation: Option<String>,
}

impl Recommendation {
    pub fn new(strategy: Strategy, game: GeneratedGame) -> Self {
        Self { strategy, game, annotation: None }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }
}

pub fn count_numbers(numbers: impl IntoIterator<Item = u8>) -> Counts {
    let mut counts = [0u32; MAX_NUMBER as usize + 1];
    for n in numbers {
        if let Some(slot) = counts.get_mut(n as usize) {
            *slot += 1;
        }
    }
    counts
}

pub fn draw_frequencies(draws: &[Draw]) -> Counts {
    count_numbers(draws.iter().flat_map(|d| d.numbers().iter().copied()))
}

/// Numéros présents au moins une fois, par fréquence décroissante puis numéro croissant.
pub fn rank_by_frequency(counts: &Counts) -> Vec<u8> {
    let mut ranked: Vec<u8> = (1..=MAX_NUMBER).filter(|&n| counts[n as usize] > 0).collect();
    ranked.sort_by(|&a, &b| counts[b as usize].cmp(&counts[a as usize]).then(a.cmp(&b)));
    ranked
}

/// Formate une liste de numéros comme sur un ticket : `03 11 19`.
pub fn format_numbers(numbers: &[u8]) -> String {
    numbers.iter().map(|n| format!("{n:02}")).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_numbers() {
        let counts = count_numbers([3, 3, 7, 45]);
        assert_eq!(counts[3], 2);
        assert_eq!(counts[7], 1);
        assert_eq!(counts[45], 1);
        assert_eq!(counts[1], 0);
    }

    #[test]
    fn test_rank_by_frequency_ties_smaller_first() {
        let counts = count_numbers([9, 9, 4, 4, 30, 2]);
        assert_eq!(rank_by_frequency(&counts), vec![4, 9, 2, 30]);
    }

    #[test]
    fn test_draw_frequencies() {
        let draws = vec![
            Draw::new(2, [1, 2, 3, 4, 5, 6]).unwrap(),
            Draw::new(1, [1, 2, 3, 40, 41, 42]).unwrap(),
        ];
        let counts = draw_frequencies(&draws);
        assert_eq!(counts[1], 2);
        assert_eq!(counts[42], 1);
        assert_eq!(counts.iter().sum::<u32>(), 12);
    }

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_numbers(&[3, 11, 19]), "03 11 19");
    }
}
