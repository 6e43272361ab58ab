//! Application configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::models::{MAX_PLAYERS, MIN_PLAYERS};

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "gamebot";
/// Prefix for environment overrides, e.g. `GAMEBOT_DATABASE_PATH`.
pub const ENV_PREFIX: &str = "GAMEBOT";

const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_PLAYERS: u8 = 2;

/// Settings read from `config.toml` and the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// SQLite file holding the catalog.
    pub database_path: PathBuf,
    /// Player count the bot screen starts with.
    #[serde(deserialize_with = "deserialize_players")]
    pub default_players: u8,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl AppConfig {
    /// Load from the default config file plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` (which may be missing) plus environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path.as_ref(), Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(path: &Path, environment: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default(
                "database_path",
                default_database_path().to_string_lossy().to_string(),
            )?
            .set_default("default_players", i64::from(DEFAULT_PLAYERS))?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(File::from(path).required(false))
            .add_source(environment.try_parsing(true))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Directory holding log files, next to the database.
    pub fn log_dir(&self) -> PathBuf {
        self.database_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("logs")
    }
}

/// Out-of-range player counts are clamped rather than rejected.
fn deserialize_players<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let players = i64::deserialize(deserializer)?;
    Ok(players.clamp(i64::from(MIN_PLAYERS), i64::from(MAX_PLAYERS)) as u8)
}

/// Platform config directory for the application.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Location of `config.toml`.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default catalog database location under the platform data directory.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("games.db")
}

/// Write a commented default config file if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let contents = format!(
        "# GameBot settings. Environment variables prefixed with {ENV_PREFIX}_ override these.\n\
         database_path = \"{}\"\n\
         default_players = {DEFAULT_PLAYERS}\n\
         log_filter = \"{DEFAULT_LOG_FILTER}\"\n",
        default_database_path().display().to_string().replace('\\', "\\\\"),
    );
    fs::write(path, contents)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    info!(path = %path.display(), "Wrote default config");
    Ok(())
}
