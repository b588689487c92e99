//! SQLite persistence layer.
//!
//! One database file is the single source of truth for every caller; CLI
//! invocations and the MCP server may run as separate processes against it.
//! Each compound mutation runs inside one IMMEDIATE transaction so writers
//! serialize and cascades commit all-or-nothing.

pub mod folders;
pub mod prompts;
pub mod tags;

use crate::models::Prompt;
use crate::utils::error::{AppError, AppResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS prompts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL,
    description TEXT,
    folder_path TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tags (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL UNIQUE COLLATE NOCASE,
    category   TEXT,
    color      TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS prompt_tags (
    prompt_id INTEGER NOT NULL REFERENCES prompts(id) ON DELETE CASCADE,
    tag_id    INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    PRIMARY KEY (prompt_id, tag_id)
);

CREATE TABLE IF NOT EXISTS folders (
    path TEXT PRIMARY KEY
);

CREATE INDEX IF NOT EXISTS idx_prompts_folder ON prompts(folder_path);
CREATE INDEX IF NOT EXISTS idx_prompts_updated ON prompts(updated_at);
";

/// Handle on the prompt database.
pub struct Store {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl Store {
    /// Opens (creating if needed) the database at `db_path`.
    pub fn open(db_path: impl Into<PathBuf>) -> AppResult<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Storage(format!("create {}: {}", parent.display(), e)))?;
        }
        let conn = Connection::open(&db_path)?;
        let store = Self {
            conn,
            db_path: Some(db_path),
        };
        store.initialize()?;
        Ok(store)
    }

    /// In-memory database, used by tests.
    pub fn in_memory() -> AppResult<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        store.initialize()?;
        Ok(store)
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn initialize(&self) -> AppResult<()> {
        // journal_mode returns a row, which execute_batch would reject
        let _ = self.conn.pragma_update(None, "journal_mode", "WAL");
        self.conn.pragma_update(None, "synchronous", "NORMAL")?;
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        self.conn.busy_timeout(BUSY_TIMEOUT)?;
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

/// Timestamps persist as RFC 3339 UTC text with a fixed precision, so
/// lexicographic ORDER BY matches chronological order.
pub(crate) fn encode_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_time(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| AppError::Storage(format!("bad timestamp '{raw}': {e}")))
}

/// Escapes `%`, `_` and `\` so user query text matches literally inside a
/// LIKE pattern (paired with `ESCAPE '\'`).
pub(crate) fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Reads one prompt row (without tags) from a `SELECT id, title, content,
/// description, folder_path, created_at, updated_at` cursor.
pub(crate) fn row_to_prompt(row: &rusqlite::Row<'_>) -> rusqlite::Result<Prompt> {
    Ok(Prompt {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        description: row.get(3)?,
        folder_path: row.get(4)?,
        created_at: decode_time(&row.get::<_, String>(5)?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?,
        updated_at: decode_time(&row.get::<_, String>(6)?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?,
        tags: Vec::new(),
    })
}

/// Tag names for a prompt, sorted case-insensitively.
pub(crate) fn tags_for_prompt(conn: &Connection, prompt_id: i64) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name FROM tags t
         JOIN prompt_tags pt ON pt.tag_id = t.id
         WHERE pt.prompt_id = ?1
         ORDER BY t.name COLLATE NOCASE",
    )?;
    let names = stmt
        .query_map([prompt_id], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}
