use crate::constants::{self, owned};
use crate::error::{Result, TransferError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_CONFIG_PATH: &str = "transfer_fees.toml";
pub const CONFIG_PATH_ENV: &str = "TRANSFER_FEES_CONFIG";
pub const DATASET_DIR_ENV: &str = "TRANSFER_FEES_DATASET_DIR";
pub const USER_AGENT_ENV: &str = "TRANSFER_FEES_USER_AGENT";
pub const TIMEOUT_ENV: &str = "TRANSFER_FEES_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub scrape: ScrapeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub dir: PathBuf,
    pub transfers_table: String,
    /// Seasons starting before this year never reach aggregation.
    pub min_year: i32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(constants::DEFAULT_DATASET_DIR),
            transfers_table: constants::TRANSFERS_TABLE.to_string(),
            min_year: constants::MIN_SEASON_YEAR,
        }
    }
}

/// Everything the scrape path knows about third-party markup lives here, so a new
/// locale or layout is a config change.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub player_id_marker: String,
    pub container_selector: String,
    pub season_markers: Vec<String>,
    pub summary_markers: Vec<String>,
    /// Columns holding the season label. Defaults to the season markers.
    pub season_columns: Vec<String>,
    pub fee_columns: Vec<String>,
    pub noise_columns: Vec<String>,
    pub from_club_columns: Vec<String>,
    pub to_club_columns: Vec<String>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            user_agent: constants::DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: constants::DEFAULT_TIMEOUT_SECS,
            player_id_marker: constants::PLAYER_ID_MARKER.to_string(),
            container_selector: constants::CONTAINER_SELECTOR.to_string(),
            season_markers: owned(constants::SEASON_MARKERS),
            summary_markers: owned(constants::SUMMARY_MARKERS),
            season_columns: owned(constants::SEASON_MARKERS),
            fee_columns: owned(constants::FEE_COLUMNS),
            noise_columns: owned(constants::NOISE_COLUMNS),
            from_club_columns: owned(constants::FROM_CLUB_COLUMNS),
            to_club_columns: owned(constants::TO_CLUB_COLUMNS),
        }
    }
}

impl ScrapeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    /// Load from `TRANSFER_FEES_CONFIG` or `transfer_fees.toml`. A missing default file
    /// yields the built-in defaults; environment overrides are applied last.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Like [`Config::load`], but an explicit path (from `--config`) wins over the
    /// environment. An explicit path that cannot be read is an error.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let explicit = match path {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::var(CONFIG_PATH_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        };
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TransferError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(dir) = std::env::var(DATASET_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.dataset.dir = PathBuf::from(dir);
            }
        }
        if let Ok(agent) = std::env::var(USER_AGENT_ENV) {
            if !agent.trim().is_empty() {
                self.scrape.user_agent = agent;
            }
        }
        if let Ok(secs) = std::env::var(TIMEOUT_ENV) {
            self.scrape.timeout_seconds = secs.trim().parse().map_err(|_| {
                TransferError::Config(format!("{} must be a whole number of seconds, got '{}'", TIMEOUT_ENV, secs))
            })?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.scrape.season_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(TransferError::Config("scrape.season_markers must name at least one marker".into()));
        }
        if self.scrape.timeout_seconds == 0 {
            return Err(TransferError::Config("scrape.timeout_seconds must be positive".into()));
        }
        if self.dataset.transfers_table.trim().is_empty() {
            return Err(TransferError::Config("dataset.transfers_table must not be empty".into()));
        }
        Ok(())
    }
}
