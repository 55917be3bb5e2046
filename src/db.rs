use std::fs;
use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, warn};

use crate::config::DatabaseConfig;
use crate::error::{ConverterError, Result};
use crate::models::{DbLlmdRow, ProcessedRow};
use crate::repository::Store;
use crate::schema::llmd;

/// SQLite-backed store for the llmd dataset table
pub struct Database {
    conn: Option<Connection>,
    in_transaction: bool,
}

impl Database {
    /// Open (or create) the database file and apply the schema
    pub fn open(path: &Path, config: &DatabaseConfig) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if config.create_parent_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(config.busy_timeout_secs))?;
        Self::run_migrations(&conn)?;

        debug!(path = %path.display(), "Opened dataset database");

        Ok(Self {
            conn: Some(conn),
            in_transaction: false,
        })
    }

    /// Open a private in-memory database, mainly for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::run_migrations(&conn)?;
        Ok(Self {
            conn: Some(conn),
            in_transaction: false,
        })
    }

    /// Run database migrations
    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(include_str!("../migrations/2025-03-15-000000_create_llmd/up.sql"))?;
        Ok(())
    }

    fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(ConverterError::StoreClosed)
    }

    /// Number of rows in the dataset table
    pub fn count_rows(&self) -> Result<usize> {
        let count: i64 = self.connection()?.query_row(
            &format!("SELECT COUNT(*) FROM {}", llmd::TABLE),
            params![],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Get a row by ID
    pub fn get_row(&self, id: i64) -> Result<Option<DbLlmdRow>> {
        let conn = self.connection()?;

        let raw = conn
            .query_row(
                &format!("SELECT * FROM {} WHERE {} = ?", llmd::TABLE, llmd::ID),
                params![id],
                map_raw_row,
            )
            .optional()?;

        raw.map(RawRow::decode).transpose()
    }

    /// All rows whose prompt hashed to `prompt_hash`, oldest first
    pub fn rows_by_hash(&self, prompt_hash: &[u8]) -> Result<Vec<DbLlmdRow>> {
        let conn = self.connection()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} WHERE {} = ? ORDER BY {} ASC",
            llmd::TABLE,
            llmd::PROMPT_HASH,
            llmd::ID
        ))?;
        let row_iter = stmt.query_map(params![prompt_hash], map_raw_row)?;

        let mut results = Vec::new();
        for raw in row_iter {
            results.push(raw?.decode()?);
        }

        Ok(results)
    }

    /// Names of the indexes defined on the dataset table
    pub fn index_names(&self) -> Result<Vec<String>> {
        let conn = self.connection()?;

        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = ? AND sql IS NOT NULL ORDER BY name",
        )?;
        let name_iter = stmt.query_map(params![llmd::TABLE], |row| row.get::<_, String>(0))?;

        let mut names = Vec::new();
        for name in name_iter {
            names.push(name?);
        }

        Ok(names)
    }
}

impl Store for Database {
    fn insert(&mut self, row: &ProcessedRow) -> Result<i64> {
        let gen_tokens = serde_json::to_string(&row.gen_tokens)?;
        let n_gen_tokens = i64::try_from(row.n_gen_tokens).unwrap_or(i64::MAX);

        let start_transaction = !self.in_transaction;
        let conn = self.connection()?;
        if start_transaction {
            conn.execute_batch("BEGIN")?;
        }
        self.in_transaction = true;

        let conn = self.connection()?;
        let mut stmt = conn.prepare_cached(&format!(
            "INSERT INTO {} ({}, {}, {}) VALUES (?, ?, ?)",
            llmd::TABLE,
            llmd::PROMPT_HASH,
            llmd::GEN_TOKENS,
            llmd::N_GEN_TOKENS
        ))?;
        stmt.execute(params![row.prompt_hash.as_slice(), gen_tokens, n_gen_tokens])?;

        Ok(conn.last_insert_rowid())
    }

    fn commit(&mut self) -> Result<()> {
        if self.in_transaction {
            self.connection()?.execute_batch("COMMIT")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        if self.in_transaction {
            warn!("Closing dataset database with uncommitted rows; rolling back");
            conn.execute_batch("ROLLBACK")?;
            self.in_transaction = false;
        }

        conn.close().map_err(|(_, e)| ConverterError::Database(e))
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if let Some(conn) = &self.conn {
            if self.in_transaction {
                if let Err(e) = conn.execute_batch("ROLLBACK") {
                    warn!(error = %e, "Failed to roll back dataset transaction");
                }
            }
        }
    }
}

/// Row as read from SQLite, before decoding the JSON token column
struct RawRow {
    id: i64,
    prompt_hash: Vec<u8>,
    gen_tokens: String,
    n_gen_tokens: i64,
}

impl RawRow {
    fn decode(self) -> Result<DbLlmdRow> {
        Ok(DbLlmdRow {
            id: self.id,
            prompt_hash: self.prompt_hash,
            gen_tokens: serde_json::from_str(&self.gen_tokens)?,
            n_gen_tokens: self.n_gen_tokens,
        })
    }
}

/// Map a database row to a `RawRow`
fn map_raw_row(row: &Row) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(llmd::ID)?,
        prompt_hash: row.get(llmd::PROMPT_HASH)?,
        gen_tokens: row.get(llmd::GEN_TOKENS)?,
        n_gen_tokens: row.get(llmd::N_GEN_TOKENS)?,
    })
}
