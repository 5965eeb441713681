//! # Admin Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CUP_DB_PATH=/srv/cups.db                                           │
//! │     CUP_DB_MAX_CONNECTIONS=4                                           │
//! │     CUP_INITIAL_CUPS=100                                               │
//! │     CUP_LOG=debug                                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cup-admin/cup-admin.toml (Linux)                         │
//! │     ~/Library/Application Support/com.wiredbrain.cup-admin/ (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/var/lib/cup-admin/cups.db"
//! max_connections = 5
//!
//! [stock]
//! initial_cups = 0
//!
//! [logging]
//! filter = "info,cup=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{AdminError, AdminResult};

const CONFIG_FILE_NAME: &str = "cup-admin.toml";
const DATABASE_FILE_NAME: &str = "cups.db";

// =============================================================================
// Sections
// =============================================================================

/// Where the cup database lives and how many connections it gets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. Falls back to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Stock seeding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSettings {
    /// Cups stocked when the database starts out with no cups and no
    /// orders.
    #[serde(default)]
    pub initial_cups: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,cup=debug,sqlx=warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Admin Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub stock: StockSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AdminConfig {
    /// Loads configuration from file and environment.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(config_path: Option<PathBuf>) -> AdminResult<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::resolve_path(config_path) {
            if path.exists() {
                info!(?path, "Loading admin config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document. Missing sections take their defaults.
    pub fn from_toml(contents: &str) -> AdminResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file, creating parent directories. Returns
    /// the path written.
    pub fn save(&self, config_path: Option<PathBuf>) -> AdminResult<PathBuf> {
        let path = Self::resolve_path(config_path)
            .ok_or_else(|| AdminError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Admin config saved");
        Ok(path)
    }

    pub fn validate(&self) -> AdminResult<()> {
        if self.database.max_connections == 0 {
            return Err(AdminError::InvalidConfig(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(AdminError::InvalidConfig(
                "logging.filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `CUP_*` overrides from `lookup`. Unparseable numbers are
    /// ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("CUP_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(max) = lookup("CUP_DB_MAX_CONNECTIONS") {
            match max.parse() {
                Ok(parsed) => self.database.max_connections = parsed,
                Err(_) => warn!(value = %max, "Ignoring CUP_DB_MAX_CONNECTIONS"),
            }
        }

        if let Some(cups) = lookup("CUP_INITIAL_CUPS") {
            match cups.parse() {
                Ok(parsed) => self.stock.initial_cups = parsed,
                Err(_) => warn!(value = %cups, "Ignoring CUP_INITIAL_CUPS"),
            }
        }

        if let Some(filter) = lookup("CUP_LOG") {
            self.logging.filter = filter;
        }
    }

    /// The explicit path if given, else the platform default.
    pub fn resolve_path(config_path: Option<PathBuf>) -> Option<PathBuf> {
        config_path.or_else(Self::default_config_path)
    }

    /// Platform config location, e.g. `~/.config/cup-admin/cup-admin.toml`.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "wiredbrain", "cup-admin")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Database file to open: the configured path, else the platform data
    /// directory, else the working directory.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.database.path {
            return path.clone();
        }

        directories::ProjectDirs::from("com", "wiredbrain", "cup-admin")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }
}

// =============================================================================
// Tests
// =============================================================================
