//! RON-backed configuration surface of the batch binary.
//!
//! Every field is optional in the file; unset fields fall back to the
//! defaults below. Example:
//!
//! ```ron
//! AppConfig(
//!     mode: Both,
//!     output_root: "./atp-history",
//!     period_start: Some("2010"),
//!     period_stop: Some("2017"),
//!     period_limit: Some(5),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use archive_core::{HistoryConfig, PacingParams};
use archive_logging::LogDestination;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Mode {
    Matches,
    Rankings,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LogMode {
    Terminal,
    File,
    Both,
}

impl From<LogMode> for LogDestination {
    fn from(mode: LogMode) -> Self {
        match mode {
            LogMode::Terminal => LogDestination::Terminal,
            LogMode::File => LogDestination::File,
            LogMode::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: Mode,
    pub matches_url: String,
    pub rankings_url: String,
    pub period_start: Option<String>,
    pub period_stop: Option<String>,
    pub period_limit: Option<u32>,
    pub ranking_depth: u32,
    pub output_root: PathBuf,
    pub pacing_shape: u32,
    pub pacing_scale_secs: f64,
    pub pacing_seed: Option<u64>,
    pub log: LogMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Matches,
            matches_url: "http://www.atpworldtour.com/en/scores/results-archive".to_string(),
            rankings_url: "http://www.atpworldtour.com/en/rankings/singles".to_string(),
            period_start: None,
            period_stop: None,
            period_limit: None,
            ranking_depth: 500,
            output_root: PathBuf::from("./atp-history"),
            pacing_shape: 3,
            pacing_scale_secs: 1.0,
            pacing_seed: None,
            log: LogMode::Terminal,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(ron::de::from_str(&text)?)
    }

    /// Map the file surface onto the engine's run configuration.
    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig {
            period_start: self.period_start.clone(),
            period_stop: self.period_stop.clone(),
            period_limit: self.period_limit,
            ranking_depth: self.ranking_depth,
            output_root: self.output_root.clone(),
            pacing: PacingParams {
                shape: self.pacing_shape,
                scale_secs: self.pacing_scale_secs,
                seed: self.pacing_seed,
            },
        }
    }
}
