//! KarutaStore — abstracts the storage backend for the command handler and read endpoints.
//!
//! Uses enum dispatch to support multiple backends without trait objects.
//! - `Db` variant — SQLite database (storage = "db")
//! - `Ephemeral` variant — in-memory index (storage = "ephemeral")

use crate::db::{self, Database};
use crate::ephemeral::EphemeralIndex;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A karuta card: a single-kana key and its text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// What an upsert did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Storage backend shared by all requests
#[derive(Clone)]
pub enum KarutaStore {
    /// SQLite database backend
    Db(Arc<Database>),
    /// In-memory ephemeral backend
    Ephemeral(Arc<EphemeralIndex>),
}

impl KarutaStore {
    /// Look up an entry by key
    pub async fn get(&self, key: &str) -> Result<Option<Entry>> {
        match self {
            KarutaStore::Db(db) => {
                let key = key.to_string();
                db.with_conn(move |conn| db::get_entry(conn, &key)).await
            }
            KarutaStore::Ephemeral(idx) => Ok(idx.get(key)),
        }
    }

    /// Insert a new entry. Fails if the key already exists.
    pub async fn insert(&self, key: &str, value: &str) -> Result<()> {
        match self {
            KarutaStore::Db(db) => {
                let (k, v) = (key.to_string(), value.to_string());
                match db.with_conn(move |conn| db::insert_entry(conn, &k, &v)).await {
                    Err(CoreError::Database(rusqlite::Error::SqliteFailure(e, _)))
                        if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                    {
                        Err(CoreError::Conflict("Entry", key.to_string()))
                    }
                    result => result,
                }
            }
            KarutaStore::Ephemeral(idx) => {
                if idx.insert(key, value) {
                    Ok(())
                } else {
                    Err(CoreError::Conflict("Entry", key.to_string()))
                }
            }
        }
    }

    /// Replace the value of an existing entry. Fails with `NotFound` if absent.
    pub async fn update(&self, key: &str, value: &str) -> Result<()> {
        let updated = match self {
            KarutaStore::Db(db) => {
                let (k, v) = (key.to_string(), value.to_string());
                db.with_conn(move |conn| db::update_entry(conn, &k, &v))
                    .await?
                    > 0
            }
            KarutaStore::Ephemeral(idx) => idx.update(key, value),
        };

        if updated {
            Ok(())
        } else {
            Err(CoreError::NotFound("Entry", key.to_string()))
        }
    }

    /// Insert the entry if absent, otherwise replace its value.
    ///
    /// Atomic per backend: the SQLite variant runs lookup and write while
    /// holding the connection lock, the in-memory variant under its write lock.
    pub async fn upsert(&self, key: &str, value: &str) -> Result<UpsertOutcome> {
        match self {
            KarutaStore::Db(db) => {
                let (key, value) = (key.to_string(), value.to_string());
                db.with_conn(move |conn| db::upsert_entry(conn, &key, &value))
                    .await
            }
            KarutaStore::Ephemeral(idx) => Ok(idx.upsert(key, value)),
        }
    }

    /// All entries, ordered by key
    pub async fn list_all(&self) -> Result<Vec<Entry>> {
        match self {
            KarutaStore::Db(db) => db.with_conn(db::list_entries).await,
            KarutaStore::Ephemeral(idx) => Ok(idx.list_all()),
        }
    }
}
