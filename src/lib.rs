//! vim-karuta - Lingr chat bot that stores and recalls karuta cards
//!
//! Room members teach the bot one card per hiragana:
//! - `!vim-karuta <key> <value>` registers or updates a card
//! - `?vim-karuta <key>` recalls it
//!
//! Cards live in a single SQLite table (or an in-memory map) and can be
//! listed over HTTP as plain text (`GET /`) or JSON (`GET /json`).
//!
//! # Usage
//!
//! As a library:
//! ```ignore
//! use karuta::{Config, Core};
//!
//! let core = Core::new(Config::default()).unwrap();
//! core.start_api_server().await.unwrap();
//! ```
//!
//! As a standalone server (CLI):
//! ```text
//! PORT=8080 karuta --config karuta.toml
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod ephemeral;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod store;

// Re-export main types for convenience
pub use config::{Config, Storage};
pub use db::Database;
pub use error::{CoreError, Result};
pub use handlers::KarutaHandler;
pub use store::{Entry, KarutaStore, UpsertOutcome};

use ephemeral::EphemeralIndex;
use std::sync::Arc;

/// Core service: configuration plus the storage it selected
pub struct Core {
    /// Configuration
    pub config: Config,

    /// Storage backend
    store: KarutaStore,
}

impl Core {
    /// Create a new Core instance, opening storage per the configuration
    pub fn new(config: Config) -> Result<Self> {
        let store = match config.storage {
            Storage::Db => {
                let db_path = config.db_path();
                tracing::info!("Opening database at {}", db_path.display());
                KarutaStore::Db(Arc::new(Database::new(db_path)?))
            }
            Storage::Ephemeral => {
                tracing::info!("Using ephemeral in-memory storage");
                KarutaStore::Ephemeral(Arc::new(EphemeralIndex::new()))
            }
        };

        Ok(Core { config, store })
    }

    /// Get a reference to the storage backend
    pub fn store(&self) -> &KarutaStore {
        &self.store
    }

    /// Start the HTTP API server (blocks until shutdown)
    pub async fn start_api_server(&self) -> Result<()> {
        let addr = self.config.server_addr();
        tracing::info!("Starting API server on {}", addr);
        api::serve(addr, self.store.clone()).await
    }
}
