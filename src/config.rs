//! Runtime configuration
//!
//! Resolution order for each setting: explicit value (CLI flag), then
//! environment variable, then platform default.

use anyhow::{anyhow, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DATABASE_NAME: &str = "contacts_db";
const APP_DIR: &str = "takcontacts";
const BACKUP_DIR: &str = "database_backups";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

// Environment variable names
pub const ENV_DB_PATH: &str = "TAKCONTACTS_DB";
pub const ENV_BACKUP_DIR: &str = "TAKCONTACTS_BACKUP_DIR";
pub const ENV_BUSY_TIMEOUT_MS: &str = "TAKCONTACTS_BUSY_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite file holding the contacts table
    pub db_path: PathBuf,
    /// Where unreadable database files are copied before being recreated
    pub backup_dir: PathBuf,
    /// How long a call waits on another connection's lock
    pub busy_timeout: Duration,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn load(db_override: Option<PathBuf>) -> Result<Self> {
        Self::resolve(db_override, |key| env::var(key).ok(), dirs::data_dir())
    }

    /// Configuration rooted at an explicit database path, with defaults for the rest.
    pub fn at(db_path: impl Into<PathBuf>) -> Self {
        let db_path = db_path.into();
        let backup_dir = default_backup_dir(&db_path);
        Self {
            db_path,
            backup_dir,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    fn resolve(
        db_override: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let db_path = match db_override {
            Some(path) => path,
            None => match lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
                Some(path) => PathBuf::from(path),
                None => data_dir
                    .ok_or_else(|| anyhow!("Could not find data directory"))?
                    .join(APP_DIR)
                    .join(DATABASE_NAME),
            },
        };

        let mut config = Self::at(db_path);

        if let Some(dir) = lookup(ENV_BACKUP_DIR).filter(|v| !v.trim().is_empty()) {
            config.backup_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(ENV_BUSY_TIMEOUT_MS) {
            let ms: u64 = raw
                .trim()
                .parse()
                .map_err(|_| anyhow!("{} must be a number of milliseconds, got {:?}", ENV_BUSY_TIMEOUT_MS, raw))?;
            config.busy_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

fn default_backup_dir(db_path: &Path) -> PathBuf {
    db_path
        .parent()
        .map(|p| p.join(BACKUP_DIR))
        .unwrap_or_else(|| PathBuf::from(BACKUP_DIR))
}
