use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::models::{Draw, PICK_COUNT};
use crate::DrawStore;

const HEADER: [&str; 2] = ["round", "numbers"];

pub fn csv_path() -> PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotto_db.csv");
    path
}

/// Encode les numéros en largeur fixe : `03-11-19-25-37-44`.
pub fn encode_numbers(numbers: &[u8; PICK_COUNT]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join("-")
}

/// Lit une liste de 6 entiers. Accepte le format courant (`03-11-19-25-37-44`)
/// et l'ancien format liste (`[3, 11, 19, 25, 37, 44]`).
pub fn parse_numbers(raw: &str) -> Result<[u8; PICK_COUNT]> {
    let inner = raw
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']');

    let values: Vec<u8> = inner
        .split(|c: char| c == ',' || c == '-' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .with_context(|| format!("Numéro illisible : '{}'", s))
        })
        .collect::<Result<_>>()?;

    if values.len() != PICK_COUNT {
        bail!("Attendu {} numéros dans '{}', reçu {}", PICK_COUNT, raw, values.len());
    }

    let mut numbers = [0u8; PICK_COUNT];
    numbers.copy_from_slice(&values);
    Ok(numbers)
}

/// Numéro de tirage, y compris écrit en flottant (`1100.0`) par d'anciens exports.
fn parse_round(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    if let Ok(round) = raw.parse::<u32>() {
        return Ok(round);
    }
    let value = raw
        .parse::<f64>()
        .with_context(|| format!("Numéro de tirage illisible : '{}'", raw))?;
    if value.fract() != 0.0 || value < 1.0 || value > u32::MAX as f64 {
        bail!("Numéro de tirage invalide : '{}'", raw);
    }
    Ok(value as u32)
}

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<&str> {
        record
            .get(idx)
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let round = parse_round(get(0)?)?;
    let numbers = parse_numbers(get(1)?)?;
    Draw::new(round, numbers)
}

/// Cache CSV à deux colonnes : `round,numbers`.
pub struct CsvCache {
    path: PathBuf,
}

impl CsvCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DrawStore for CsvCache {
    fn load(&self) -> Result<Vec<Draw>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Impossible d'ouvrir {:?}", self.path))?;

        let mut draws = Vec::new();
        for (line, record_result) in reader.records().enumerate() {
            let parsed = record_result
                .context("Erreur de lecture")
                .and_then(|record| parse_record(&record));
            match parsed {
                Ok(draw) => draws.push(draw),
                Err(e) => log::warn!("Ligne {} du cache ignorée : {:#}", line + 2, e),
            }
        }

        draws.sort_by_key(|d| d.round());
        draws.dedup_by_key(|d| d.round());
        Ok(draws)
    }

    fn save(&self, draws: &[Draw]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
        }

        let mut sorted: Vec<&Draw> = draws.iter().collect();
        sorted.sort_by_key(|d| d.round());

        // Écriture dans un fichier voisin puis renommage
        let tmp_path = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&tmp_path)
                .with_context(|| format!("Impossible d'écrire {:?}", tmp_path))?;
            writer.write_record(HEADER)?;
            for draw in sorted {
                writer.write_record([draw.round().to_string(), encode_numbers(draw.numbers())])?;
            }
            writer.flush()?;
        }
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Impossible de remplacer {:?}", self.path))?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
