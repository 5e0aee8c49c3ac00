use anyhow::{bail, Result};

/// Plus petit numéro tirable.
pub const MIN_NUMBER: u8 = 1;
/// Plus grand numéro tirable.
pub const MAX_NUMBER: u8 = 45;
/// Nombre de numéros par tirage (hors bonus).
pub const PICK_COUNT: usize = 6;

/// Un tirage officiel : numéro de tirage + 6 numéros triés.
///
/// Les champs sont privés : un `Draw` n'existe que validé, et n'est jamais modifié.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    round: u32,
    numbers: [u8; PICK_COUNT],
}

impl Draw {
    pub fn new(round: u32, numbers: [u8; PICK_COUNT]) -> Result<Self> {
        if round == 0 {
            bail!("Numéro de tirage invalide : 0");
        }
        validate_numbers(&numbers)?;
        let mut numbers = numbers;
        numbers.sort_unstable();
        Ok(Self { round, numbers })
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.numbers
    }

    pub fn contains(&self, n: u8) -> bool {
        self.numbers.contains(&n)
    }
}

/// Grille générée : 6 numéros distincts de 1 à 45, triés par ordre croissant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedGame {
    numbers: [u8; PICK_COUNT],
}

impl GeneratedGame {
    pub fn new(numbers: &[u8]) -> Result<Self> {
        validate_numbers(numbers)?;
        let mut arr = [0u8; PICK_COUNT];
        arr.copy_from_slice(numbers);
        arr.sort_unstable();
        Ok(Self { numbers: arr })
    }

    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.numbers
    }

    pub fn contains(&self, n: u8) -> bool {
        self.numbers.contains(&n)
    }
}

impl From<&Draw> for GeneratedGame {
    fn from(draw: &Draw) -> Self {
        Self { numbers: draw.numbers }
    }
}

impl std::fmt::Display for GeneratedGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .numbers
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");
        write!(f, "{joined}")
    }
}

pub fn validate_numbers(numbers: &[u8]) -> Result<()> {
    if numbers.len() != PICK_COUNT {
        bail!("Attendu {} numéros, reçu {}", PICK_COUNT, numbers.len());
    }
    for &n in numbers {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
            bail!("Numéro {} hors limites ({}-{})", n, MIN_NUMBER, MAX_NUMBER);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_numbers_ok() {
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 6]).is_ok());
        assert!(validate_numbers(&[45, 44, 43, 42, 41, 40]).is_ok());
    }

    #[test]
    fn test_validate_numbers_out_of_range() {
        assert!(validate_numbers(&[0, 2, 3, 4, 5, 6]).is_err());
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 46]).is_err());
    }

    #[test]
    fn test_validate_numbers_duplicate() {
        assert!(validate_numbers(&[1, 1, 3, 4, 5, 6]).is_err());
    }

    #[test]
    fn test_validate_numbers_wrong_count() {
        assert!(validate_numbers(&[1, 2, 3, 4, 5]).is_err());
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 6, 7]).is_err());
    }

    #[test]
    fn test_draw_sorts_numbers() {
        let draw = Draw::new(1100, [44, 3, 25, 11, 37, 19]).unwrap();
        assert_eq!(draw.numbers(), &[3, 11, 19, 25, 37, 44]);
        assert_eq!(draw.round(), 1100);
        assert!(draw.contains(25));
        assert!(!draw.contains(26));
    }

    #[test]
    fn test_draw_round_zero_rejected() {
        assert!(Draw::new(0, [1, 2, 3, 4, 5, 6]).is_err());
    }

    #[test]
    fn test_generated_game_sorted_and_displayed() {
        let game = GeneratedGame::new(&[30, 2, 17, 45, 9, 1]).unwrap();
        assert_eq!(game.numbers(), &[1, 2, 9, 17, 30, 45]);
        assert_eq!(game.to_string(), " 1 -  2 -  9 - 17 - 30 - 45");
    }

    #[test]
    fn test_generated_game_from_draw() {
        let draw = Draw::new(7, [6, 5, 4, 3, 2, 1]).unwrap();
        let game = GeneratedGame::from(&draw);
        assert_eq!(game.numbers(), draw.numbers());
    }
}
