use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

/// Heure (locale) à partir de laquelle le tirage du samedi est considéré comme effectué.
pub const DRAW_HOUR: u32 = 21;

/// Date du tirage n°1.
pub fn first_draw_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2002, 12, 7).expect("date du premier tirage valide")
}

/// Numéro du dernier tirage censé avoir eu lieu à l'instant `now`.
/// Un tirage par semaine depuis le premier ; le samedi avant 21h, le tirage du jour n'a pas encore eu lieu.
pub fn expected_latest_round(now: NaiveDateTime) -> u32 {
    let days = (now.date() - first_draw_date()).num_days();
    if days < 0 {
        return 0;
    }
    let mut round = (days / 7 + 1) as u32;
    if now.weekday() == Weekday::Sat && now.hour() < DRAW_HOUR {
        round -= 1;
    }
    round
}

pub fn expected_latest_round_now() -> u32 {
    expected_latest_round(chrono::Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_first_draw() {
        assert_eq!(expected_latest_round(at(2002, 12, 7, 22)), 1);
        assert_eq!(expected_latest_round(at(2002, 12, 7, 10)), 0);
        assert_eq!(expected_latest_round(at(2002, 12, 13, 23)), 1);
    }

    #[test]
    fn test_before_first_draw() {
        assert_eq!(expected_latest_round(at(2001, 1, 1, 12)), 0);
    }

    #[test]
    fn test_saturday_before_draw_hour() {
        // Tirage 1100 le samedi 30/12/2023
        assert_eq!(expected_latest_round(at(2023, 12, 30, 20)), 1099);
        assert_eq!(expected_latest_round(at(2023, 12, 30, 21)), 1100);
    }

    #[test]
    fn test_midweek() {
        assert_eq!(expected_latest_round(at(2024, 1, 3, 9)), 1100);
    }
}
