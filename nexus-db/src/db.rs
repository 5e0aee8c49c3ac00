use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::models::Draw;
use crate::DrawStore;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    round     INTEGER PRIMARY KEY,
    number_1  INTEGER NOT NULL,
    number_2  INTEGER NOT NULL,
    number_3  INTEGER NOT NULL,
    number_4  INTEGER NOT NULL,
    number_5  INTEGER NOT NULL,
    number_6  INTEGER NOT NULL
);
";

pub fn db_path() -> PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("nexus.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let n = draw.numbers();
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (round, number_1, number_2, number_3, number_4, number_5, number_6)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![draw.round(), n[0], n[1], n[2], n[3], n[4], n[5]],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

type RawRow = (u32, [u8; 6]);

fn query_rows(conn: &Connection, sql: &str, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([limit], |row| {
        Ok((
            row.get::<_, u32>(0)?,
            [
                row.get::<_, u8>(1)?,
                row.get::<_, u8>(2)?,
                row.get::<_, u8>(3)?,
                row.get::<_, u8>(4)?,
                row.get::<_, u8>(5)?,
                row.get::<_, u8>(6)?,
            ],
        ))
    })?.collect::<Result<Vec<RawRow>, _>>()?;

    rows.into_iter()
        .map(|(round, numbers)| {
            Draw::new(round, numbers).with_context(|| format!("Tirage {} corrompu en base", round))
        })
        .collect()
}

/// Derniers tirages, du plus récent au plus ancien.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    query_rows(
        conn,
        "SELECT round, number_1, number_2, number_3, number_4, number_5, number_6
         FROM draws ORDER BY round DESC LIMIT ?1",
        limit,
    )
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

pub fn max_round(conn: &Connection) -> Result<Option<u32>> {
    let max: Option<u32> = conn.query_row("SELECT MAX(round) FROM draws", [], |row| row.get(0))?;
    Ok(max)
}

/// Stockage SQLite : chaque sauvegarde est une transaction unique.
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn connect(&self) -> Result<Connection> {
        let conn = open_db(&self.path)?;
        migrate(&conn)?;
        Ok(conn)
    }
}

impl DrawStore for SqliteStore {
    fn load(&self) -> Result<Vec<Draw>> {
        let conn = self.connect()?;
        let mut draws = fetch_last_draws(&conn, u32::MAX)?;
        draws.reverse();
        Ok(draws)
    }

    fn save(&self, draws: &[Draw]) -> Result<()> {
        let conn = self.connect()?;
        let tx = conn.unchecked_transaction()
            .context("Impossible de démarrer la transaction")?;
        let mut inserted = 0u32;
        for draw in draws {
            if insert_draw(&tx, draw)? {
                inserted += 1;
            }
        }
        tx.commit().context("Échec du commit")?;
        log::debug!("{} nouveaux tirages écrits dans {:?}", inserted, self.path);
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn count(&self) -> Result<usize> {
        Ok(count_draws(&self.connect()?)? as usize)
    }

    fn latest_round(&self) -> Result<Option<u32>> {
        max_round(&self.connect()?)
    }
}
