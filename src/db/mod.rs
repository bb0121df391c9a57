//! Database module for vim-karuta
//!
//! Provides SQLite storage for karuta entries.

pub mod schema;

use crate::error::Result;
use crate::store::{Entry, UpsertOutcome};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// SQLite database behind a single shared connection
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and ensure the schema exists
    pub fn new(db_path: PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path)?;
        Ok(Self::from_connection(conn, &db_path))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn, Path::new(":memory:")))
    }

    fn from_connection(conn: Connection, path: &Path) -> Self {
        // Not fatal: queries against a missing table fail and get logged per request.
        if let Err(e) = schema::init_db(&conn) {
            tracing::warn!("Failed to initialize schema at {}: {}", path.display(), e);
        }

        Database {
            conn: Mutex::new(conn),
        }
    }

    /// Lock the connection
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        // Statements are atomic, so a poisoned lock still guards a consistent connection.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` against the connection on the blocking thread pool
    pub async fn with_conn<F, T>(self: &Arc<Self>, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(self);
        let result = tokio::task::spawn_blocking(move || {
            let conn = db.conn();
            f(&conn)
        })
        .await?;
        Ok(result?)
    }
}

// ============================================================================
// Karuta queries
// ============================================================================

/// Fetch one entry by key
pub fn get_entry(conn: &Connection, key: &str) -> rusqlite::Result<Option<Entry>> {
    conn.query_row(
        "SELECT key, value FROM karuta WHERE key = ?1",
        [key],
        |row| {
            Ok(Entry {
                key: row.get(0)?,
                value: row.get(1)?,
            })
        },
    )
    .optional()
}

/// Insert a new entry; fails with a constraint error if the key exists
pub fn insert_entry(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO karuta (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

/// Replace the value of an existing entry. Returns the number of rows changed.
pub fn update_entry(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE karuta SET value = ?2 WHERE key = ?1",
        params![key, value],
    )
}

/// Insert the entry if absent, else replace its value
pub fn upsert_entry(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<UpsertOutcome> {
    if get_entry(conn, key)?.is_some() {
        update_entry(conn, key, value)?;
        Ok(UpsertOutcome::Updated)
    } else {
        insert_entry(conn, key, value)?;
        Ok(UpsertOutcome::Inserted)
    }
}

/// All entries, ordered by key
pub fn list_entries(conn: &Connection) -> rusqlite::Result<Vec<Entry>> {
    let mut stmt = conn.prepare("SELECT key, value FROM karuta ORDER BY key ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(Entry {
            key: row.get(0)?,
            value: row.get(1)?,
        })
    })?;
    rows.collect()
}
