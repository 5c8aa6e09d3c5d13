pub mod migrations;
pub mod models;
pub mod queries;
pub mod seed;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

pub const DEFAULT_DB_FILE: &str = "emotune.db";

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the store, create missing tables and seed empty ones.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        // WAL mode for concurrent reads. Foreign keys are declared by the
        // schema but left unenforced (SQLite's default).
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;
        seed::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }
}

/// `emotune.db` next to the running executable, falling back to the
/// working directory when the executable path is unavailable.
pub fn default_db_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_DB_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}
