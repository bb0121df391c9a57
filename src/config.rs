//! Configuration management for vim-karuta
//!
//! Loads settings from a TOML file (default `karuta.toml`), then applies
//! environment overrides such as `PORT`.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Storage backend: "db" (SQLite, default) or "ephemeral" (in-memory)
    #[serde(default)]
    pub storage: Storage,
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
    /// SQLite file on disk
    #[default]
    Db,
    /// In-memory map, lost on restart
    Ephemeral,
}

impl std::str::FromStr for Storage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "db" => Ok(Storage::Db),
            "ephemeral" => Ok(Storage::Ephemeral),
            other => Err(CoreError::Config(format!(
                "Unknown storage \"{}\" (expected \"db\" or \"ephemeral\")",
                other
            ))),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port (default: 80)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Server host (default: 0.0.0.0, the webhook must be reachable from Lingr)
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    80
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl ServerConfig {
    /// Apply a listen address override.
    ///
    /// Accepts `host:port`, or `:port` to listen on all interfaces.
    pub fn apply_addr(&mut self, addr: &str) -> Result<()> {
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| CoreError::Config(format!("Invalid address \"{}\"", addr)))?;

        let port: u16 = port
            .parse()
            .map_err(|_| CoreError::Config(format!("Invalid port in address \"{}\"", addr)))?;

        self.host = if host.is_empty() {
            default_host()
        } else {
            host.trim_start_matches('[').trim_end_matches(']').to_string()
        };
        self.port = port;
        Ok(())
    }
}

/// SQLite database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the database file
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("karuta.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: default_db_path(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let expanded_path = expand_path(path.as_ref());

        if !expanded_path.exists() {
            return Err(CoreError::Config(format!(
                "Configuration file not found: {}",
                expanded_path.display()
            )));
        }

        let content = std::fs::read_to_string(&expanded_path)?;
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }

    /// Get the database path, expanding ~ if present
    pub fn db_path(&self) -> PathBuf {
        expand_path(&self.database.path)
    }

    /// Get the server socket address
    pub fn server_addr(&self) -> SocketAddr {
        use std::net::ToSocketAddrs;

        let host = if self.server.host.contains(':') {
            format!("[{}]", self.server.host)
        } else {
            self.server.host.clone()
        };

        format!("{}:{}", host, self.server.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], self.server.port)))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Ok(host) = std::env::var("KARUTA_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(path) = std::env::var("KARUTA_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }
        if let Ok(storage) = std::env::var("KARUTA_STORAGE") {
            match storage.parse() {
                Ok(storage) => self.storage = storage,
                Err(e) => tracing::warn!("Ignoring KARUTA_STORAGE: {}", e),
            }
        }
    }

    /// Create a default configuration file at the given path
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let content = r#"# vim-karuta configuration

# Storage backend
# "db"        = SQLite file (persistent, default)
# "ephemeral" = in-memory, lost on restart
storage = "db"

[server]
# Host to bind to; Lingr must be able to reach the webhook
host = "0.0.0.0"

# Port to listen on (the PORT environment variable overrides this)
port = 80

[database]
# SQLite database file
path = "karuta.db"
"#;

        let path = expand_path(path.as_ref());
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;

        Ok(())
    }
}

/// Expand ~ to home directory in paths
pub fn expand_path(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
