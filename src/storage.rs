use chrono::{DateTime, Local, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS players (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nickname TEXT NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS results (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        player_id INTEGER NOT NULL REFERENCES players(id),
        score INTEGER NOT NULL,
        wpm REAL NOT NULL,
        accuracy REAL NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_results_score ON results(score);
"#;

/// One leaderboard line
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub nickname: String,
    pub score: u32,
    pub wpm: f64,
    pub accuracy: f64,
    pub created_at: DateTime<Local>,
}

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// The database could not be opened at startup
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Sqlite(e) => write!(f, "database error: {e}"),
            StoreError::Unavailable(reason) => write!(f, "results store unavailable: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Sqlite(e) => Some(e),
            StoreError::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite(e)
    }
}

/// Append-only store of finished sessions
pub trait ResultStore {
    /// Append one result, creating the player on first use
    fn save_result(
        &mut self,
        nickname: &str,
        score: u32,
        wpm: f64,
        accuracy: f64,
    ) -> Result<(), StoreError>;

    /// Best results first; equal scores list the most recent first
    fn top_results(&self, limit: usize) -> Result<Vec<ResultRow>, StoreError>;
}

/// SQLite-backed results database
#[derive(Debug)]
pub struct ResultsDb {
    conn: Connection,
}

impl ResultsDb {
    /// Open the database at the default location
    pub fn open_default() -> rusqlite::Result<Self> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("typefall.db"));
        Self::open(&path)
    }

    /// Open (and create if needed) the database at `path`
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(ResultsDb { conn })
    }

    /// Id of the player with this exact (trimmed) nickname, inserted if new
    pub fn player_id(&self, nickname: &str) -> rusqlite::Result<i64> {
        player_id(&self.conn, nickname)
    }

    /// Append a result with an explicit timestamp
    pub fn record_result(
        &mut self,
        nickname: &str,
        score: u32,
        wpm: f64,
        accuracy: f64,
        created_at: DateTime<Local>,
    ) -> rusqlite::Result<()> {
        let tx = self.conn.transaction()?;
        let player_id = player_id(&tx, nickname)?;
        tx.execute(
            r#"
            INSERT INTO results (player_id, score, wpm, accuracy, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                player_id,
                score,
                wpm,
                accuracy,
                format_timestamp(created_at)
            ],
        )?;
        tx.commit()
    }

    pub fn query_top(&self, limit: usize) -> rusqlite::Result<Vec<ResultRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.nickname, r.score, r.wpm, r.accuracy, r.created_at
            FROM results r
            JOIN players p ON p.id = r.player_id
            ORDER BY r.score DESC, r.created_at DESC, r.id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            let created_at: String = row.get(4)?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        4,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?
                .with_timezone(&Local);

            Ok(ResultRow {
                nickname: row.get(0)?,
                score: row.get(1)?,
                wpm: row.get(2)?,
                accuracy: row.get(3)?,
                created_at,
            })
        })?;

        rows.collect()
    }

    /// Number of distinct players ever recorded
    pub fn player_count(&self) -> rusqlite::Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))
    }
}

impl ResultStore for ResultsDb {
    fn save_result(
        &mut self,
        nickname: &str,
        score: u32,
        wpm: f64,
        accuracy: f64,
    ) -> Result<(), StoreError> {
        self.record_result(nickname, score, wpm, accuracy, Local::now())?;
        Ok(())
    }

    fn top_results(&self, limit: usize) -> Result<Vec<ResultRow>, StoreError> {
        Ok(self.query_top(limit)?)
    }
}

/// Stand-in used when the database cannot be opened; every call fails
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ResultStore for UnavailableStore {
    fn save_result(&mut self, _: &str, _: u32, _: f64, _: f64) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }

    fn top_results(&self, _: usize) -> Result<Vec<ResultRow>, StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}

fn player_id(conn: &Connection, nickname: &str) -> rusqlite::Result<i64> {
    let nickname = nickname.trim();
    conn.execute(
        "INSERT OR IGNORE INTO players (nickname) VALUES (?1)",
        params![nickname],
    )?;
    conn.query_row(
        "SELECT id FROM players WHERE nickname = ?1",
        params![nickname],
        |row| row.get(0),
    )
}

// UTC with a fixed width so that text order matches time order
fn format_timestamp(ts: DateTime<Local>) -> String {
    ts.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Micros, true)
}
