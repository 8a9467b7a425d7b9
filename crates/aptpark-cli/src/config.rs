//! Runtime configuration read from the environment.

use anyhow::{Context, Result};
use aptpark_core::constants::DEFAULT_WAITLIST_CAPACITY;
use aptpark_storage::DatabaseConfig;
use std::path::PathBuf;

pub const DATABASE_VAR: &str = "APTPARK_DATABASE";
pub const REPORT_DIR_VAR: &str = "APTPARK_REPORT_DIR";
pub const WAITLIST_CAPACITY_VAR: &str = "APTPARK_WAITLIST_CAPACITY";
pub const LOG_VAR: &str = "APTPARK_LOG";

const DEFAULT_DATABASE: &str = "aptpark.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite file holding every table
    pub database_path: String,

    /// Where history reports are written
    pub report_dir: PathBuf,

    /// Slots in the in-memory waiting-list ring
    pub waitlist_capacity: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source; unset or blank
    /// variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let waitlist_capacity = match var(WAITLIST_CAPACITY_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{WAITLIST_CAPACITY_VAR} must be a whole number, got {raw:?}"))?,
            None => DEFAULT_WAITLIST_CAPACITY,
        };

        Ok(Self {
            database_path: var(DATABASE_VAR).unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            report_dir: var(REPORT_DIR_VAR).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
            waitlist_capacity,
        })
    }

    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_path.clone())
    }
}
